//! Customers domain module.
//!
//! Registration rules and the in-memory customer registry, implemented as
//! deterministic domain logic (no IO). Persistence of registrations is the
//! infrastructure layer's job; it replays `CustomerRegistered` events back through
//! [`CustomerRegistry::apply`] at startup.

pub mod customer;
pub mod registry;

pub use customer::{Customer, CustomerRegistered};
pub use registry::CustomerRegistry;
