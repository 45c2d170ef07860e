use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reviewdesk_core::field::{ensure_log_safe, ensure_present};
use reviewdesk_core::{CustomerId, DomainError, DomainResult, Entity, ProductId};
use reviewdesk_customers::CustomerRegistry;

use crate::ledger::{ReviewLedger, DEFAULT_MAX_REVIEWS};
use crate::product::Product;
use crate::review::{Rating, ReviewSubmitted};

/// Ceilings enforced by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLimits {
    pub max_reviews_per_product: usize,
    /// `None` means unbounded.
    pub max_products: Option<usize>,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            max_reviews_per_product: DEFAULT_MAX_REVIEWS,
            max_products: None,
        }
    }
}

/// Command: SubmitReview (raw, un-normalized input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReview {
    pub product_id: String,
    pub product_name: String,
    pub customer_id: String,
    pub rating: f64,
    pub text: String,
    pub occurred_at: DateTime<Utc>,
}

/// Indexed product store.
///
/// Products live in insertion order (which breaks ranking ties); a hash index
/// maps each normalized id to its slot.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    limits: CatalogLimits,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: CatalogLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> CatalogLimits {
        self.limits
    }

    /// Look up a product by raw (un-normalized) id.
    pub fn find(&self, product_id: &str) -> DomainResult<&Product> {
        let id = ProductId::new(product_id);
        self.get(&id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&idx| &self.products[idx])
    }

    /// Return the existing product, or create an empty one named `name`.
    ///
    /// An existing product keeps its stored name; `name` is ignored for it.
    /// Submissions do not go through here: [`ProductCatalog::apply`] creates the
    /// product of an accepted review with the same creation step.
    pub fn get_or_create(&mut self, product_id: &str, name: &str) -> DomainResult<&Product> {
        let id: ProductId = product_id.parse()?;
        if !self.index.contains_key(&id) {
            ensure_present("product name", name)?;
            self.ensure_room_for_product()?;
        }
        let idx = self.slot_for(&id, name);
        Ok(&self.products[idx])
    }

    /// Decide whether a review can be accepted.
    ///
    /// Checks, in order: rating bounds, customer registration, field validity,
    /// one review per customer, then ceilings. Does not mutate state; in
    /// particular a rejected submission never creates the product it names.
    pub fn handle_submit(
        &self,
        customers: &CustomerRegistry,
        cmd: &SubmitReview,
    ) -> DomainResult<ReviewSubmitted> {
        let rating = Rating::new(cmd.rating)?;

        let customer_id = CustomerId::new(&cmd.customer_id);
        if !customers.contains(&customer_id) {
            return Err(DomainError::unknown_customer(customer_id.as_str()));
        }

        let product_id: ProductId = cmd.product_id.parse()?;
        ensure_log_safe("review text", &cmd.text)?;

        let product_name = match self.get(&product_id) {
            Some(product) => {
                product.ledger().admit(&product_id, &customer_id)?;
                product.name().to_string()
            }
            None => {
                ensure_present("product name", &cmd.product_name)?;
                ReviewLedger::with_max_reviews(self.limits.max_reviews_per_product)
                    .admit(&product_id, &customer_id)?;
                self.ensure_room_for_product()?;
                cmd.product_name.clone()
            }
        };

        Ok(ReviewSubmitted {
            product_id,
            product_name,
            customer_id,
            rating,
            text: cmd.text.clone(),
            occurred_at: cmd.occurred_at,
        })
    }

    /// Evolve state from an accepted review, creating the product if needed.
    pub fn apply(&mut self, event: &ReviewSubmitted) {
        let idx = self.slot_for(&event.product_id, &event.product_name);
        self.products[idx].ledger_mut().append(event.entry());
    }

    /// Validate and record a review in one step.
    pub fn submit_review(
        &mut self,
        customers: &CustomerRegistry,
        cmd: &SubmitReview,
    ) -> DomainResult<ReviewSubmitted> {
        let event = self.handle_submit(customers, cmd)?;
        self.apply(&event);
        tracing::debug!(
            customer_id = %event.customer_id,
            product_id = %event.product_id,
            "review recorded"
        );
        Ok(event)
    }

    /// The `n` best-rated products, highest average first.
    ///
    /// Ties keep insertion order. `n` must be between 1 and the number of
    /// products.
    pub fn top_rated(&self, n: i64) -> DomainResult<Vec<&Product>> {
        let available = self.products.len();
        let count = usize::try_from(n)
            .ok()
            .filter(|&count| count > 0 && count <= available)
            .ok_or(DomainError::InvalidCount {
                requested: n,
                available,
            })?;

        let mut ranked: Vec<&Product> = self.products.iter().collect();
        // `sort_by` is stable, so equal averages stay in insertion order.
        ranked.sort_by(|a, b| b.average_rating().total_cmp(&a.average_rating()));
        ranked.truncate(count);
        Ok(ranked)
    }

    /// Products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn ensure_room_for_product(&self) -> DomainResult<()> {
        match self.limits.max_products {
            Some(max) if self.products.len() >= max => Err(DomainError::capacity(format!(
                "product limit of {max} reached"
            ))),
            _ => Ok(()),
        }
    }

    /// Index of product `id`, appending an empty one named `name` if missing.
    /// Callers have already validated the name and the product ceiling.
    fn slot_for(&mut self, id: &ProductId, name: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let product = Product::new(id.clone(), name, self.limits.max_reviews_per_product);
        let idx = self.products.len();
        self.index.insert(product.id().clone(), idx);
        self.products.push(product);
        tracing::debug!(product_id = %id, "product created");
        idx
    }
}
