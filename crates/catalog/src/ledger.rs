use reviewdesk_core::{CustomerId, DomainError, DomainResult, ProductId};

use crate::review::ReviewEntry;

/// Default per-product review ceiling.
pub const DEFAULT_MAX_REVIEWS: usize = 50;

/// Ordered review history of one product, with its cached average.
///
/// Invariants:
/// - at most one entry per customer
/// - `average() == mean(entries[*].rating)`, recomputed on every append
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewLedger {
    entries: Vec<ReviewEntry>,
    average: f64,
    max_reviews: usize,
}

impl Default for ReviewLedger {
    fn default() -> Self {
        Self::with_max_reviews(DEFAULT_MAX_REVIEWS)
    }
}

impl ReviewLedger {
    pub fn with_max_reviews(max_reviews: usize) -> Self {
        Self {
            entries: Vec::new(),
            average: 0.0,
            max_reviews,
        }
    }

    /// Check whether `customer_id` may add a review to this ledger.
    ///
    /// Duplicate check first, then the ceiling. Does not mutate state.
    pub fn admit(&self, product_id: &ProductId, customer_id: &CustomerId) -> DomainResult<()> {
        if self.has_review_from(customer_id) {
            return Err(DomainError::duplicate_review(
                customer_id.as_str(),
                product_id.as_str(),
            ));
        }
        if self.entries.len() >= self.max_reviews {
            return Err(DomainError::capacity(format!(
                "product {product_id} already has the maximum of {} reviews",
                self.max_reviews
            )));
        }
        Ok(())
    }

    /// Append an admitted entry and update the running mean.
    pub fn append(&mut self, entry: ReviewEntry) {
        let rating = entry.rating.value();
        self.entries.push(entry);
        self.average += (rating - self.average) / self.entries.len() as f64;
    }

    pub fn has_review_from(&self, customer_id: &CustomerId) -> bool {
        self.entries.iter().any(|e| &e.customer_id == customer_id)
    }

    pub fn entries(&self) -> &[ReviewEntry] {
        &self.entries
    }

    /// Mean rating, or 0 when there are no reviews.
    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_reviews(&self) -> usize {
        self.max_reviews
    }
}
