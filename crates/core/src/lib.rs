//! `reviewdesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, normalized identifiers, and the entity/value-object markers
//! shared by the customer and catalog crates.

pub mod entity;
pub mod error;
pub mod field;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{normalize, CustomerId, ProductId, MAX_ID_LEN};
pub use value_object::ValueObject;
