use chrono::{DateTime, Utc};

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (record-format evolution)
/// - designed to be **append-only**
pub trait Event: Clone + core::fmt::Debug + 'static {
    /// Stable event name/type identifier (e.g. "catalog.review.submitted").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time), if the record carries one.
    ///
    /// Registration records are stored without a timestamp, so replayed
    /// registrations report `None`.
    fn occurred_at(&self) -> Option<DateTime<Utc>>;
}
