//! Append-only record logs.
//!
//! Two logical logs back the store: one shared customer log, and one review log
//! per customer. [`EventLog`] is the boundary; [`FileEventLog`] is the durable
//! text-file implementation and [`InMemoryEventLog`] the one used by tests and
//! benchmarks. Both share the line format in [`codec`].

pub mod codec;
pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::FileEventLog;
pub use in_memory::InMemoryEventLog;
pub use r#trait::{EventLog, LogRecord};
