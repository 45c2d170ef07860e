//! Line format shared by every log implementation.
//!
//! ```text
//! customer log:  customerId|displayName
//! review log:    productId|productDisplayName|rating(%.2f)|reviewText|YYYY-MM-DD HH:MM:SS
//! ```
//!
//! Fields are not escaped. The domain refuses `|` and line breaks in every
//! field before anything reaches a log.

use chrono::NaiveDateTime;

use reviewdesk_catalog::{ReviewSubmitted, SubmitReview};
use reviewdesk_core::field::ensure_present;
use reviewdesk_core::CustomerId;
use reviewdesk_customers::CustomerRegistered;
use reviewdesk_events::EventEnvelope;

use crate::error::PersistenceError;
use crate::event_log::r#trait::LogRecord;

pub const FIELD_DELIMITER: char = '|';
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CUSTOMER_FIELDS: usize = 2;
const REVIEW_FIELDS: usize = 5;

pub fn encode_customer(event: &CustomerRegistered) -> String {
    format!("{}{FIELD_DELIMITER}{}", event.customer_id, event.name)
}

pub fn decode_customer(line: &str) -> Result<CustomerRegistered, String> {
    let fields = split_fields(line, CUSTOMER_FIELDS)?;
    let customer_id: CustomerId = fields[0].parse().map_err(|e| format!("{e}"))?;
    ensure_present("customer name", fields[1]).map_err(|e| format!("{e}"))?;

    Ok(CustomerRegistered {
        customer_id,
        name: fields[1].to_string(),
        occurred_at: None,
    })
}

pub fn encode_review(event: &ReviewSubmitted) -> String {
    format!(
        "{}{d}{}{d}{:.2}{d}{}{d}{}",
        event.product_id,
        event.product_name,
        event.rating.value(),
        event.text,
        event.occurred_at.format(TIMESTAMP_FORMAT),
        d = FIELD_DELIMITER,
    )
}

/// Decode a review line of `customer_id`'s log into a replayable command.
///
/// Only the shape is checked here (field count, number, timestamp); rating
/// bounds and the rest of the review rules are enforced by the catalog.
pub fn decode_review(customer_id: &CustomerId, line: &str) -> Result<SubmitReview, String> {
    let fields = split_fields(line, REVIEW_FIELDS)?;
    let rating: f64 = fields[2]
        .trim()
        .parse()
        .map_err(|_| format!("unparsable rating {:?}", fields[2]))?;
    let occurred_at = NaiveDateTime::parse_from_str(fields[4].trim(), TIMESTAMP_FORMAT)
        .map_err(|_| format!("unparsable timestamp {:?}", fields[4]))?
        .and_utc();

    Ok(SubmitReview {
        product_id: fields[0].to_string(),
        product_name: fields[1].to_string(),
        customer_id: customer_id.as_str().to_string(),
        rating,
        text: fields[3].to_string(),
        occurred_at,
    })
}

/// Split raw log contents into lines and decode each one.
///
/// Blank lines are ignored. Line numbers are 1-based.
pub fn decode_stream<E, F>(stream: &str, contents: &[u8], decode: F) -> Vec<LogRecord<E>>
where
    F: Fn(&str) -> Result<E, String>,
{
    contents
        .split(|b| *b == b'\n')
        .enumerate()
        .filter(|(_, raw)| !raw.iter().all(|b| b.is_ascii_whitespace()))
        .map(|(idx, raw)| -> LogRecord<E> {
            let line = (idx + 1) as u64;
            let malformed = |reason: String| PersistenceError::Malformed {
                stream: stream.to_string(),
                line,
                reason,
            };
            let text = std::str::from_utf8(raw)
                .map_err(|_| malformed("line is not valid UTF-8".to_string()))?;
            let text = text.strip_suffix('\r').unwrap_or(text);
            decode(text)
                .map(|payload| EventEnvelope::new(stream, line, payload))
                .map_err(malformed)
        })
        .collect()
}

fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, String> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != expected {
        return Err(format!(
            "expected {expected} fields, found {}",
            fields.len()
        ));
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use reviewdesk_catalog::Rating;
    use reviewdesk_core::ProductId;

    fn review_event() -> ReviewSubmitted {
        ReviewSubmitted {
            product_id: ProductId::new("p1"),
            product_name: "Widget".to_string(),
            customer_id: CustomerId::new("a1"),
            rating: Rating::new(4.5).unwrap(),
            text: "Good".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
        }
    }

    #[test]
    fn customer_line_format() {
        let event = CustomerRegistered {
            customer_id: CustomerId::new("a1"),
            name: "Alice Smith".to_string(),
            occurred_at: None,
        };
        assert_eq!(encode_customer(&event), "A1|Alice Smith");
        assert_eq!(decode_customer("A1|Alice Smith").unwrap(), event);
    }

    #[test]
    fn review_line_format() {
        assert_eq!(
            encode_review(&review_event()),
            "P1|Widget|4.50|Good|2024-03-09 14:05:07"
        );
    }

    #[test]
    fn review_line_decodes_to_command_with_stored_timestamp() {
        let cmd = decode_review(&CustomerId::new("A1"), "P1|Widget|4.50|Good|2024-03-09 14:05:07")
            .unwrap();
        assert_eq!(cmd.product_id, "P1");
        assert_eq!(cmd.product_name, "Widget");
        assert_eq!(cmd.customer_id, "A1");
        assert_eq!(cmd.rating, 4.5);
        assert_eq!(cmd.text, "Good");
        assert_eq!(cmd.occurred_at, review_event().occurred_at);
    }

    #[test]
    fn review_text_may_be_empty() {
        let cmd = decode_review(&CustomerId::new("A1"), "P1|Widget|3.00||2024-03-09 14:05:07")
            .unwrap();
        assert_eq!(cmd.text, "");
    }

    #[test]
    fn malformed_lines_are_reported() {
        let id = CustomerId::new("A1");
        assert!(decode_review(&id, "P1|Widget|4.50|Good").is_err());
        assert!(decode_review(&id, "P1|Widget|great|Good|2024-03-09 14:05:07").is_err());
        assert!(decode_review(&id, "P1|Widget|4.50|Good|yesterday").is_err());
        assert!(decode_customer("A1").is_err());
        assert!(decode_customer("A1|Alice|extra").is_err());
        assert!(decode_customer("|Alice").is_err());
    }

    #[test]
    fn decode_stream_numbers_lines_and_keeps_going() {
        let contents = b"A1|Alice\r\nbroken\n\nB2|Bob\n";
        let records = decode_stream("customers", contents, decode_customer);

        assert_eq!(records.len(), 3);
        let first = records[0].as_ref().unwrap();
        assert_eq!(first.sequence_number(), 1);
        assert_eq!(first.payload().name, "Alice");
        match &records[1] {
            Err(PersistenceError::Malformed { stream, line, .. }) => {
                assert_eq!(stream, "customers");
                assert_eq!(*line, 2);
            }
            other => panic!("Expected Malformed record, got {other:?}"),
        }
        assert_eq!(records[2].as_ref().unwrap().sequence_number(), 4);
    }
}
