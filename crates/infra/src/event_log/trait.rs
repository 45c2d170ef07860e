use reviewdesk_catalog::{ReviewSubmitted, SubmitReview};
use reviewdesk_core::CustomerId;
use reviewdesk_customers::CustomerRegistered;
use reviewdesk_events::EventEnvelope;

use crate::error::PersistenceError;

/// One decoded line of a log, or the reason it could not be decoded.
pub type LogRecord<E> = Result<EventEnvelope<E>, PersistenceError>;

/// Append-only store of registrations and review submissions.
///
/// ## Append Semantics
///
/// An `append_*` call returns only after the record has been written and
/// flushed. Appends are never rewritten or removed.
///
/// ## Load Semantics
///
/// `load_*` returns every line of the log in file order. Lines that fail to
/// decode come back as `Err(PersistenceError::Malformed)` entries so the caller
/// can skip them; a log that does not exist yet loads as empty. Only failures to
/// read the log as a whole are returned as the outer error.
///
/// Review lines are decoded into [`SubmitReview`] commands (carrying their
/// stored timestamp) because replay pushes them back through the same decision
/// path a live submission takes.
pub trait EventLog {
    fn append_customer(&self, event: &CustomerRegistered) -> Result<(), PersistenceError>;

    /// Append to the review log of `event.customer_id`.
    fn append_review(&self, event: &ReviewSubmitted) -> Result<(), PersistenceError>;

    fn load_customers(&self) -> Result<Vec<LogRecord<CustomerRegistered>>, PersistenceError>;

    fn load_reviews(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<LogRecord<SubmitReview>>, PersistenceError>;
}
