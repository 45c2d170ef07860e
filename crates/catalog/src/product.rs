use reviewdesk_core::{Entity, ProductId};

use crate::ledger::ReviewLedger;
use crate::review::ReviewEntry;

/// Entity: Product, owning its review ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    ledger: ReviewLedger,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, max_reviews: usize) -> Self {
        Self {
            id,
            name: name.into(),
            ledger: ReviewLedger::with_max_reviews(max_reviews),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reviews in submission order.
    pub fn reviews(&self) -> &[ReviewEntry] {
        self.ledger.entries()
    }

    pub fn review_count(&self) -> usize {
        self.ledger.len()
    }

    pub fn average_rating(&self) -> f64 {
        self.ledger.average()
    }

    pub fn ledger(&self) -> &ReviewLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut ReviewLedger {
        &mut self.ledger
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
