use reviewdesk_core::ProductId;

/// Bounded list of the product ids successfully searched this session.
///
/// Not persisted. Once `capacity` ids are held, further searches are not
/// recorded; nothing is evicted.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: Vec<ProductId>,
    capacity: usize,
}

impl SearchHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Remember a search. Returns `false` when the history is already full.
    pub fn record(&mut self, product_id: ProductId) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries.push(product_id);
        true
    }

    /// Recorded ids, oldest first. Repeated searches appear repeatedly.
    pub fn entries(&self) -> &[ProductId] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
