//! Catalog domain module: products, their review ledgers, and ranking.
//!
//! This crate contains the review rules (rating bounds, one review per customer
//! per product, per-product ceilings) implemented purely as deterministic domain
//! logic (no IO). The infrastructure layer persists `ReviewSubmitted` events and
//! replays them through the same decision path at startup.

pub mod catalog;
pub mod ledger;
pub mod product;
pub mod review;

pub use catalog::{CatalogLimits, ProductCatalog, SubmitReview};
pub use ledger::ReviewLedger;
pub use product::Product;
pub use review::{Rating, ReviewEntry, ReviewSubmitted, MAX_RATING, MIN_RATING};
