//! Domain events and the envelope they travel in.
//!
//! Every successful mutation in the store is described by an event
//! (`CustomerRegistered`, `ReviewSubmitted`). Events are what the persistence layer
//! appends to its logs, and what replay feeds back into the domain at startup.

pub mod envelope;
pub mod event;

pub use envelope::EventEnvelope;
pub use event::Event;
