use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;

use reviewdesk_catalog::{ReviewSubmitted, SubmitReview};
use reviewdesk_core::CustomerId;
use reviewdesk_customers::CustomerRegistered;

use super::codec;
use super::r#trait::{EventLog, LogRecord};
use crate::error::PersistenceError;

const CUSTOMER_STREAM: &str = "customers";

/// In-memory append-only event log.
///
/// Intended for tests/dev. Lines are held in their encoded text form, so the
/// same codec runs as with the file log. Writes can be switched to fail to
/// exercise the "applied in memory, not on disk" path, and single streams can
/// be made unreadable.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    streams: RefCell<HashMap<String, Vec<String>>>,
    unreadable: RefCell<HashSet<String>>,
    fail_writes: Cell<bool>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn review_stream(customer_id: &CustomerId) -> String {
        format!("reviews/{customer_id}")
    }

    /// Make every following append fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Make every following load of `stream` fail with an I/O error.
    pub fn set_unreadable(&self, stream: &str) {
        self.unreadable.borrow_mut().insert(stream.to_string());
    }

    /// Append a raw line, bypassing the codec (e.g. to plant a corrupt record).
    pub fn push_raw(&self, stream: &str, line: impl Into<String>) {
        self.streams
            .borrow_mut()
            .entry(stream.to_string())
            .or_default()
            .push(line.into());
    }

    pub fn lines(&self, stream: &str) -> Vec<String> {
        self.streams.borrow().get(stream).cloned().unwrap_or_default()
    }

    fn append(&self, stream: &str, line: String) -> Result<(), PersistenceError> {
        if self.fail_writes.get() {
            return Err(PersistenceError::io(
                stream,
                std::io::Error::new(ErrorKind::Other, "writes disabled"),
            ));
        }
        self.push_raw(stream, line);
        Ok(())
    }

    fn load<E, F>(&self, stream: &str, decode: F) -> Result<Vec<LogRecord<E>>, PersistenceError>
    where
        F: Fn(&str) -> Result<E, String>,
    {
        if self.unreadable.borrow().contains(stream) {
            return Err(PersistenceError::io(
                stream,
                std::io::Error::new(ErrorKind::PermissionDenied, "stream unreadable"),
            ));
        }
        let contents = self.lines(stream).join("\n");
        Ok(codec::decode_stream(stream, contents.as_bytes(), decode))
    }
}

impl EventLog for InMemoryEventLog {
    fn append_customer(&self, event: &CustomerRegistered) -> Result<(), PersistenceError> {
        self.append(CUSTOMER_STREAM, codec::encode_customer(event))
    }

    fn append_review(&self, event: &ReviewSubmitted) -> Result<(), PersistenceError> {
        self.append(
            &Self::review_stream(&event.customer_id),
            codec::encode_review(event),
        )
    }

    fn load_customers(&self) -> Result<Vec<LogRecord<CustomerRegistered>>, PersistenceError> {
        self.load(CUSTOMER_STREAM, codec::decode_customer)
    }

    fn load_reviews(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<LogRecord<SubmitReview>>, PersistenceError> {
        self.load(&Self::review_stream(customer_id), |line| {
            codec::decode_review(customer_id, line)
        })
    }
}
