//! Startup replay: rebuilding the registry and catalog from the logs.
//!
//! Order matters only within a log:
//! 1. The customer log is applied line by line; the first registration of an id
//!    wins.
//! 2. For every registered customer (in registration order), that customer's
//!    review log is decoded into `SubmitReview` commands carrying their stored
//!    timestamps and pushed through `ProductCatalog::handle_submit`, the same
//!    decision path a live submission takes. Nothing is written back.
//!
//! Bad records never abort replay. Malformed lines, duplicate reviews and
//! records the catalog rejects are skipped and counted in the [`ReplayReport`].
//! A review log that cannot be read at all is skipped for that customer only.

use serde::Serialize;

use reviewdesk_catalog::ProductCatalog;
use reviewdesk_core::{CustomerId, DomainError, Entity};
use reviewdesk_customers::CustomerRegistry;
use reviewdesk_events::Event;

use crate::error::PersistenceError;
use crate::event_log::EventLog;

/// Summary of one replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Customers restored from the customer log.
    pub customers_loaded: usize,
    /// Customer lines ignored because the id was already restored.
    pub duplicate_customers: usize,
    /// Reviews restored into the catalog.
    pub reviews_replayed: usize,
    /// Review lines ignored because the customer already reviewed the product.
    pub duplicate_reviews: usize,
    /// Lines that could not be decoded or carried an invalid field.
    pub malformed_records: usize,
    /// Well-formed review lines the catalog refused (e.g. a ceiling was reached).
    pub rejected_records: usize,
    /// Per-customer review logs that could not be opened or read.
    pub unreadable_logs: usize,
}

impl ReplayReport {
    pub fn skipped(&self) -> usize {
        self.duplicate_customers
            + self.duplicate_reviews
            + self.malformed_records
            + self.rejected_records
            + self.unreadable_logs
    }
}

/// Replay `log` into empty `customers` and `catalog`.
///
/// Returns an error only when the customer log cannot be read at all.
pub fn replay<L>(
    log: &L,
    customers: &mut CustomerRegistry,
    catalog: &mut ProductCatalog,
) -> Result<ReplayReport, PersistenceError>
where
    L: EventLog + ?Sized,
{
    let mut report = ReplayReport::default();

    for record in log.load_customers()? {
        match record {
            Ok(envelope) => {
                if customers.apply(envelope.payload()) {
                    report.customers_loaded += 1;
                } else {
                    tracing::warn!(
                        stream = envelope.stream(),
                        line = envelope.sequence_number(),
                        customer_id = %envelope.payload().customer_id,
                        "duplicate customer record skipped"
                    );
                    report.duplicate_customers += 1;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "malformed customer record skipped");
                report.malformed_records += 1;
            }
        }
    }

    let customer_ids: Vec<CustomerId> = customers.iter().map(|c| c.id().clone()).collect();
    for customer_id in &customer_ids {
        let records = match log.load_reviews(customer_id) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(%customer_id, error = %e, "unreadable review log skipped");
                report.unreadable_logs += 1;
                continue;
            }
        };
        for record in records {
            let envelope = match record {
                Ok(envelope) => envelope,
                Err(e) => {
                    tracing::warn!(error = %e, "malformed review record skipped");
                    report.malformed_records += 1;
                    continue;
                }
            };

            match catalog.handle_submit(customers, envelope.payload()) {
                Ok(event) => {
                    catalog.apply(&event);
                    report.reviews_replayed += 1;
                    tracing::debug!(
                        customer_id = %event.customer_id,
                        product_id = %event.product_id,
                        occurred_at = ?event.occurred_at(),
                        "review replayed"
                    );
                }
                Err(DomainError::DuplicateReview { customer, product }) => {
                    tracing::warn!(
                        stream = envelope.stream(),
                        line = envelope.sequence_number(),
                        %customer,
                        %product,
                        "duplicate review record skipped"
                    );
                    report.duplicate_reviews += 1;
                }
                Err(e @ (DomainError::InvalidRating(_) | DomainError::Validation(_))) => {
                    tracing::warn!(
                        stream = envelope.stream(),
                        line = envelope.sequence_number(),
                        error = %e,
                        "malformed review record skipped"
                    );
                    report.malformed_records += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        stream = envelope.stream(),
                        line = envelope.sequence_number(),
                        error = %e,
                        "review record rejected during replay"
                    );
                    report.rejected_records += 1;
                }
            }
        }
    }

    tracing::info!(
        customers = report.customers_loaded,
        reviews = report.reviews_replayed,
        products = catalog.len(),
        skipped = report.skipped(),
        "replay complete"
    );
    Ok(report)
}
