use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reviewdesk_core::{CustomerId, DomainError, DomainResult, ProductId, ValueObject};
use reviewdesk_events::Event;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// A star rating in `[1.0, 5.0]`, held at two-decimal precision.
///
/// Two decimals is the precision ratings are written to disk with, so an
/// in-memory rating and its replayed copy are always equal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Validate a raw rating. Bounds are checked before rounding.
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(DomainError::InvalidRating(value));
        }
        Ok(Self((value * 100.0).round() / 100.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl ValueObject for Rating {}

impl TryFrom<f64> for Rating {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl core::fmt::Display for Rating {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// One customer's review of one product. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub customer_id: CustomerId,
    pub rating: Rating,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

/// Event: ReviewSubmitted.
///
/// `product_name` is the product's stored display name (the submitter's name
/// only when the submission creates the product).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSubmitted {
    pub product_id: ProductId,
    pub product_name: String,
    pub customer_id: CustomerId,
    pub rating: Rating,
    pub text: String,
    pub occurred_at: DateTime<Utc>,
}

impl ReviewSubmitted {
    pub fn entry(&self) -> ReviewEntry {
        ReviewEntry {
            customer_id: self.customer_id.clone(),
            rating: self.rating,
            text: self.text.clone(),
            submitted_at: self.occurred_at,
        }
    }
}

impl Event for ReviewSubmitted {
    fn event_type(&self) -> &'static str {
        "catalog.review.submitted"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> Option<DateTime<Utc>> {
        Some(self.occurred_at)
    }
}
