//! Interactive menu over a [`reviewdesk_infra::ReviewStore`].
//!
//! The shell owns no review logic: every menu action is one store call plus
//! formatting. It is generic over its input and output so tests can script it.

pub mod shell;

pub use shell::Shell;
