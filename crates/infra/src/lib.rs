//! Infrastructure layer: append-only text logs, startup replay, configuration,
//! and the `ReviewStore` facade the interactive shell talks to.

pub mod config;
pub mod error;
pub mod event_log;
pub mod history;
pub mod replay;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use error::{PersistenceError, StoreError, StoreResult};
pub use event_log::{EventLog, FileEventLog, InMemoryEventLog};
pub use history::SearchHistory;
pub use replay::{replay, ReplayReport};
pub use store::ReviewStore;
