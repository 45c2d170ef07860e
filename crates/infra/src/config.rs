//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `REVIEWDESK_DATA_DIR` - Root directory for the logs (default: `data`)
//! - `REVIEWDESK_MAX_REVIEWS_PER_PRODUCT` - Per-product review ceiling (default: 50)
//! - `REVIEWDESK_MAX_CUSTOMERS` - Customer ceiling (default: unbounded)
//! - `REVIEWDESK_MAX_PRODUCTS` - Product ceiling (default: unbounded)
//! - `REVIEWDESK_SEARCH_HISTORY` - Search history capacity (default: 50)
//!
//! # Data layout
//!
//! ```text
//! <data_dir>/customers.txt          one `customerId|displayName` line per registration
//! <data_dir>/reviews/<ID>.txt       one review line per submission by customer <ID>
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use reviewdesk_catalog::CatalogLimits;
use reviewdesk_core::CustomerId;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_MAX_REVIEWS_PER_PRODUCT: usize = 50;
pub const DEFAULT_SEARCH_HISTORY: usize = 50;

const CUSTOMER_LOG_FILE: &str = "customers.txt";
const REVIEW_LOG_DIR: &str = "reviews";
const REVIEW_LOG_EXTENSION: &str = "txt";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Review store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root directory holding the customer log and the review logs.
    pub data_dir: PathBuf,
    /// Reviews accepted per product before `CapacityExceeded`.
    pub max_reviews_per_product: usize,
    /// Registered customers accepted before `CapacityExceeded`; `None` = unbounded.
    pub max_customers: Option<usize>,
    /// Products accepted before `CapacityExceeded`; `None` = unbounded.
    pub max_products: Option<usize>,
    /// Number of successful searches remembered per session.
    pub search_history: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl StoreConfig {
    /// Defaults rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            max_reviews_per_product: DEFAULT_MAX_REVIEWS_PER_PRODUCT,
            max_customers: None,
            max_products: None,
            search_history: DEFAULT_SEARCH_HISTORY,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (environment, map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            lookup("REVIEWDESK_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );

        if let Some(max) = parse_var::<usize>(&lookup, "REVIEWDESK_MAX_REVIEWS_PER_PRODUCT")? {
            if max == 0 {
                return Err(ConfigError::InvalidEnvVar(
                    "REVIEWDESK_MAX_REVIEWS_PER_PRODUCT".to_string(),
                    "must be at least 1".to_string(),
                ));
            }
            config.max_reviews_per_product = max;
        }
        config.max_customers = parse_var(&lookup, "REVIEWDESK_MAX_CUSTOMERS")?;
        config.max_products = parse_var(&lookup, "REVIEWDESK_MAX_PRODUCTS")?;
        if let Some(capacity) = parse_var(&lookup, "REVIEWDESK_SEARCH_HISTORY")? {
            config.search_history = capacity;
        }

        Ok(config)
    }

    pub fn with_max_reviews_per_product(mut self, max: usize) -> Self {
        self.max_reviews_per_product = max;
        self
    }

    pub fn with_max_customers(mut self, max: usize) -> Self {
        self.max_customers = Some(max);
        self
    }

    pub fn with_max_products(mut self, max: usize) -> Self {
        self.max_products = Some(max);
        self
    }

    pub fn with_search_history(mut self, capacity: usize) -> Self {
        self.search_history = capacity;
        self
    }

    pub fn catalog_limits(&self) -> CatalogLimits {
        CatalogLimits {
            max_reviews_per_product: self.max_reviews_per_product,
            max_products: self.max_products,
        }
    }

    pub fn customer_log_path(&self) -> PathBuf {
        self.data_dir.join(CUSTOMER_LOG_FILE)
    }

    pub fn review_log_dir(&self) -> PathBuf {
        self.data_dir.join(REVIEW_LOG_DIR)
    }

    /// Review log of one customer, named by its normalized id.
    pub fn review_log_path(&self, customer_id: &CustomerId) -> PathBuf {
        review_log_path_in(&self.review_log_dir(), customer_id)
    }
}

pub(crate) fn review_log_path_in(dir: &Path, customer_id: &CustomerId) -> PathBuf {
    dir.join(format!("{}.{}", customer_id.as_str(), REVIEW_LOG_EXTENSION))
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}
