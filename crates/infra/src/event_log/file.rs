use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use reviewdesk_catalog::{ReviewSubmitted, SubmitReview};
use reviewdesk_core::CustomerId;
use reviewdesk_customers::CustomerRegistered;

use super::codec;
use super::r#trait::{EventLog, LogRecord};
use crate::config::{review_log_path_in, StoreConfig};
use crate::error::PersistenceError;

/// Text-file event log.
///
/// Every append opens the file in append mode, writes one line and calls
/// `sync_data` before returning, so a returned `Ok` means the record is on disk.
#[derive(Debug, Clone)]
pub struct FileEventLog {
    customer_log: PathBuf,
    review_dir: PathBuf,
}

impl FileEventLog {
    /// Open (and create, if needed) the log directories described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self, PersistenceError> {
        let review_dir = config.review_log_dir();
        fs::create_dir_all(&review_dir).map_err(|e| PersistenceError::io(&review_dir, e))?;

        Ok(Self {
            customer_log: config.customer_log_path(),
            review_dir,
        })
    }

    pub fn customer_log_path(&self) -> &Path {
        &self.customer_log
    }

    pub fn review_log_path(&self, customer_id: &CustomerId) -> PathBuf {
        review_log_path_in(&self.review_dir, customer_id)
    }

    fn append_line(path: &Path, line: &str) -> Result<(), PersistenceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| PersistenceError::io(path, e))?;
        file.write_all(format!("{line}\n").as_bytes())
            .and_then(|()| file.sync_data())
            .map_err(|e| PersistenceError::io(path, e))
    }

    /// Whole-file read; a missing file reads as empty.
    fn read_all(path: &Path) -> Result<Vec<u8>, PersistenceError> {
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(PersistenceError::io(path, e)),
        }
    }
}

impl EventLog for FileEventLog {
    fn append_customer(&self, event: &CustomerRegistered) -> Result<(), PersistenceError> {
        Self::append_line(&self.customer_log, &codec::encode_customer(event))
    }

    fn append_review(&self, event: &ReviewSubmitted) -> Result<(), PersistenceError> {
        let path = self.review_log_path(&event.customer_id);
        Self::append_line(&path, &codec::encode_review(event))
    }

    fn load_customers(&self) -> Result<Vec<LogRecord<CustomerRegistered>>, PersistenceError> {
        let contents = Self::read_all(&self.customer_log)?;
        let stream = self.customer_log.display().to_string();
        Ok(codec::decode_stream(&stream, &contents, codec::decode_customer))
    }

    fn load_reviews(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<LogRecord<SubmitReview>>, PersistenceError> {
        let path = self.review_log_path(customer_id);
        let contents = Self::read_all(&path)?;
        let stream = path.display().to_string();
        Ok(codec::decode_stream(&stream, &contents, |line| {
            codec::decode_review(customer_id, line)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use reviewdesk_catalog::Rating;
    use reviewdesk_core::ProductId;
    use tempfile::TempDir;

    fn open_log() -> (TempDir, FileEventLog) {
        let dir = TempDir::new().unwrap();
        let log = FileEventLog::open(&StoreConfig::new(dir.path())).unwrap();
        (dir, log)
    }

    #[test]
    fn open_creates_review_directory() {
        let (dir, _log) = open_log();
        assert!(dir.path().join("reviews").is_dir());
    }

    #[test]
    fn missing_logs_load_empty() {
        let (_dir, log) = open_log();
        assert!(log.load_customers().unwrap().is_empty());
        assert!(log.load_reviews(&CustomerId::new("A1")).unwrap().is_empty());
    }

    #[test]
    fn appends_land_as_lines_in_the_right_files() {
        let (dir, log) = open_log();
        log.append_customer(&CustomerRegistered {
            customer_id: CustomerId::new("a1"),
            name: "Alice".to_string(),
            occurred_at: Some(Utc::now()),
        })
        .unwrap();
        log.append_review(&ReviewSubmitted {
            product_id: ProductId::new("p1"),
            product_name: "Widget".to_string(),
            customer_id: CustomerId::new("a1"),
            rating: Rating::new(4.5).unwrap(),
            text: "Good".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        })
        .unwrap();

        let customers = fs::read_to_string(dir.path().join("customers.txt")).unwrap();
        assert_eq!(customers, "A1|Alice\n");
        let reviews = fs::read_to_string(dir.path().join("reviews").join("A1.txt")).unwrap();
        assert_eq!(reviews, "P1|Widget|4.50|Good|2024-01-02 03:04:05\n");

        let loaded = log.load_reviews(&CustomerId::new("A1")).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].as_ref().unwrap().payload().product_id, "P1");
    }

    #[test]
    fn append_failure_is_an_io_error() {
        let (dir, log) = open_log();
        fs::remove_dir_all(dir.path().join("reviews")).unwrap();
        fs::write(dir.path().join("reviews"), b"not a directory").unwrap();

        let err = log
            .append_review(&ReviewSubmitted {
                product_id: ProductId::new("p1"),
                product_name: "Widget".to_string(),
                customer_id: CustomerId::new("a1"),
                rating: Rating::new(3.0).unwrap(),
                text: String::new(),
                occurred_at: Utc::now(),
            })
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
