//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain rejections. Every variant
/// is raised before any state is touched, so a rejected operation leaves the
/// registry and catalog exactly as they were. Storage failures belong to the
/// infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A rating fell outside the accepted `[1.0, 5.0]` range (or was not finite).
    #[error("invalid rating {0}: must be between 1.0 and 5.0")]
    InvalidRating(f64),

    /// The submitting customer is not registered.
    #[error("unknown customer: {0}")]
    UnknownCustomer(String),

    /// The customer already reviewed this product.
    #[error("customer {customer} already reviewed product {product}")]
    DuplicateReview { customer: String, product: String },

    /// A customer with the same normalized identifier already exists.
    #[error("customer already registered: {0}")]
    DuplicateCustomer(String),

    /// A configured ceiling (customers, products, reviews per product) was reached.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// A requested customer or product does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A ranking request asked for zero products or more than exist.
    #[error("invalid count {requested}: must be between 1 and {available}")]
    InvalidCount { requested: i64, available: usize },

    /// A field failed validation (e.g. contains the log delimiter).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn unknown_customer(id: impl Into<String>) -> Self {
        Self::UnknownCustomer(id.into())
    }

    pub fn duplicate_review(customer: impl Into<String>, product: impl Into<String>) -> Self {
        Self::DuplicateReview {
            customer: customer.into(),
            product: product.into(),
        }
    }

    pub fn duplicate_customer(id: impl Into<String>) -> Self {
        Self::DuplicateCustomer(id.into())
    }

    pub fn capacity(msg: impl Into<String>) -> Self {
        Self::CapacityExceeded(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
