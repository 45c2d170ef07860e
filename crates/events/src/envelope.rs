use serde::{Deserialize, Serialize};

/// Envelope for an event read back from (or bound for) an append-only log.
///
/// Notes:
/// - `stream` names the log the record lives in (the shared customer log, or one
///   customer's review log).
/// - `sequence_number` is the 1-based line position in that log, so replay
///   diagnostics can point at the exact record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    stream: String,

    /// Monotonically increasing position in the stream.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(stream: impl Into<String>, sequence_number: u64, payload: E) -> Self {
        Self {
            stream: stream.into(),
            sequence_number,
            payload,
        }
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_records_position() {
        let envelope = EventEnvelope::new("reviews/A1", 3, "payload");
        assert_eq!(envelope.stream(), "reviews/A1");
        assert_eq!(envelope.sequence_number(), 3);
        assert_eq!(*envelope.payload(), "payload");
    }
}
