//! Review store facade (session-level orchestration).
//!
//! `ReviewStore` owns the whole session state: the customer registry, the product
//! catalog, the search history and the event log. It is the only thing the
//! interactive shell talks to and it is passed around explicitly; there is no
//! global state.
//!
//! ## Startup
//!
//! ```text
//! StoreConfig
//!   ↓
//! 1. Open the log (create `<data_dir>/reviews/` if missing)
//!   ↓
//! 2. Replay the customer log into the registry
//!   ↓
//! 3. Replay each customer's review log into the catalog
//!   ↓
//! ReviewStore (+ ReplayReport)
//! ```
//!
//! ## Mutation Flow
//!
//! ```text
//! register_customer / submit_review
//!   ↓
//! 1. Handle (pure decision; a rejection returns StoreError::Domain, nothing changes)
//!   ↓
//! 2. Apply the event to the in-memory state
//!   ↓
//! 3. Append one line to the log (flushed before returning)
//! ```
//!
//! ## Failure Semantics
//!
//! If step 3 fails the mutation **stays applied in memory** and the call returns
//! `StoreError::Persistence`. The session keeps working, but the change will be
//! missing after a restart. The caller is responsible for telling the user.

use chrono::{DateTime, SubsecRound, Utc};

use reviewdesk_catalog::{Product, ProductCatalog, ReviewEntry, SubmitReview};
use reviewdesk_core::{Entity, ProductId};
use reviewdesk_customers::{Customer, CustomerRegistry};
use reviewdesk_events::Event;

use crate::config::StoreConfig;
use crate::error::{PersistenceError, StoreResult};
use crate::event_log::{EventLog, FileEventLog};
use crate::history::SearchHistory;
use crate::replay::{replay, ReplayReport};

/// Product-review store backed by an append-only event log.
///
/// ## Generic Parameters
///
/// - `L`: log implementation. [`FileEventLog`] in production,
///   [`crate::InMemoryEventLog`] in tests and benchmarks.
#[derive(Debug)]
pub struct ReviewStore<L = FileEventLog> {
    config: StoreConfig,
    log: L,
    customers: CustomerRegistry,
    catalog: ProductCatalog,
    history: SearchHistory,
    replay_report: ReplayReport,
}

impl ReviewStore<FileEventLog> {
    /// Open the file-backed store under `config.data_dir` and replay its logs.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let log = FileEventLog::open(&config)?;
        tracing::info!(data_dir = %config.data_dir.display(), "opening review store");
        Self::with_log(log, config)
    }

    /// Open the file-backed store configured by the `REVIEWDESK_*` environment.
    pub fn from_env() -> StoreResult<Self> {
        Self::open(StoreConfig::from_env()?)
    }
}

impl<L: EventLog> ReviewStore<L> {
    /// Build a store over an existing log, replaying whatever it holds.
    pub fn with_log(log: L, config: StoreConfig) -> StoreResult<Self> {
        let mut customers = CustomerRegistry::with_max_customers(config.max_customers);
        let mut catalog = ProductCatalog::with_limits(config.catalog_limits());
        let replay_report = replay(&log, &mut customers, &mut catalog)?;

        Ok(Self {
            history: SearchHistory::with_capacity(config.search_history),
            config,
            log,
            customers,
            catalog,
            replay_report,
        })
    }

    /// Register a new customer and append it to the customer log.
    pub fn register_customer(&mut self, id: &str, name: &str) -> StoreResult<Customer> {
        let event = self.customers.handle_register(id, name, now())?;
        self.customers.apply(&event);
        tracing::info!(
            event = event.event_type(),
            version = event.version(),
            customer_id = %event.customer_id,
            "customer registered"
        );

        persisted(self.log.append_customer(&event))?;
        Ok(Customer::from(&event))
    }

    /// Case-insensitive lookup of a registered customer.
    pub fn login(&self, id: &str) -> StoreResult<&Customer> {
        Ok(self.customers.find(id)?)
    }

    /// Submit a review stamped with the current time.
    pub fn submit_review(
        &mut self,
        product_id: &str,
        product_name: &str,
        customer_id: &str,
        rating: f64,
        text: &str,
    ) -> StoreResult<ReviewEntry> {
        self.submit(SubmitReview {
            product_id: product_id.to_string(),
            product_name: product_name.to_string(),
            customer_id: customer_id.to_string(),
            rating,
            text: text.to_string(),
            occurred_at: now(),
        })
    }

    /// Submit a fully specified review command.
    ///
    /// `occurred_at` is truncated to whole seconds. On success the review is in
    /// the catalog and appended to the customer's review log.
    pub fn submit(&mut self, cmd: SubmitReview) -> StoreResult<ReviewEntry> {
        let cmd = SubmitReview {
            occurred_at: cmd.occurred_at.trunc_subsecs(0),
            ..cmd
        };
        let event = self.catalog.handle_submit(&self.customers, &cmd)?;
        self.catalog.apply(&event);
        tracing::info!(
            event = event.event_type(),
            version = event.version(),
            customer_id = %event.customer_id,
            product_id = %event.product_id,
            rating = %event.rating,
            "review accepted"
        );

        persisted(self.log.append_review(&event))?;
        Ok(event.entry())
    }

    /// Look up a product and remember the search.
    pub fn search_product(&mut self, product_id: &str) -> StoreResult<&Product> {
        let product = self.catalog.find(product_id)?;
        if !self.history.record(product.id().clone()) {
            tracing::debug!(product_id = %product.id(), "search history full; not recorded");
        }
        Ok(product)
    }

    /// The `n` best-rated products, highest average first.
    pub fn top_rated(&self, n: i64) -> StoreResult<Vec<&Product>> {
        Ok(self.catalog.top_rated(n)?)
    }

    /// Product ids searched this session, oldest first.
    pub fn search_history(&self) -> &[ProductId] {
        self.history.entries()
    }

    pub fn customers(&self) -> &CustomerRegistry {
        &self.customers
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// What startup replay restored and skipped.
    pub fn replay_report(&self) -> &ReplayReport {
        &self.replay_report
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn into_log(self) -> L {
        self.log
    }
}

/// Timestamps are kept to whole seconds, the precision of the log format.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

fn persisted(result: Result<(), PersistenceError>) -> StoreResult<()> {
    result.map_err(|e| {
        tracing::warn!(error = %e, "mutation applied in memory but not persisted");
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::event_log::InMemoryEventLog;
    use chrono::TimeZone;
    use reviewdesk_core::DomainError;

    fn store() -> ReviewStore<InMemoryEventLog> {
        ReviewStore::with_log(InMemoryEventLog::new(), StoreConfig::default()).unwrap()
    }

    fn domain_error<T: std::fmt::Debug>(result: StoreResult<T>) -> DomainError {
        match result {
            Err(StoreError::Domain(e)) => e,
            other => panic!("Expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn register_login_review_and_search() {
        let mut store = store();
        store.register_customer("a1", "Alice").unwrap();
        assert_eq!(store.login("A1").unwrap().name(), "Alice");

        let entry = store
            .submit_review("p1", "Widget", "A1", 4.5, "Good")
            .unwrap();
        assert_eq!(entry.rating.value(), 4.5);

        let err = domain_error(store.submit_review("P1", "Widget", "a1", 3.0, "Again"));
        assert!(matches!(err, DomainError::DuplicateReview { .. }));

        store.register_customer("B2", "Bob").unwrap();
        store
            .submit_review("P1", "Ignored name", "B2", 3.5, "Meh")
            .unwrap();

        let product = store.search_product("p1").unwrap();
        assert_eq!(product.name(), "Widget");
        assert_eq!(product.review_count(), 2);
        assert!((product.average_rating() - 4.0).abs() < 1e-9);
        assert_eq!(store.search_history(), &[ProductId::new("P1")]);
    }

    #[test]
    fn successful_mutations_are_logged_once() {
        let mut store = store();
        store.register_customer("a1", "Alice").unwrap();
        store.submit_review("p1", "Widget", "a1", 4.0, "Fine").unwrap();

        let log = store.log();
        assert_eq!(log.lines("customers"), vec!["A1|Alice".to_string()]);
        let reviews = log.lines("reviews/A1");
        assert_eq!(reviews.len(), 1);
        assert!(reviews[0].starts_with("P1|Widget|4.00|Fine|"));
    }

    #[test]
    fn rejections_touch_neither_memory_nor_log() {
        let mut store = store();
        store.register_customer("a1", "Alice").unwrap();

        let err = domain_error(store.register_customer("A1", "Alice again"));
        assert_eq!(err, DomainError::DuplicateCustomer("A1".to_string()));

        let err = domain_error(store.submit_review("p1", "Widget", "nobody", 4.0, ""));
        assert_eq!(err, DomainError::UnknownCustomer("NOBODY".to_string()));

        let err = domain_error(store.submit_review("p1", "Widget", "a1", 0.5, ""));
        assert!(matches!(err, DomainError::InvalidRating(_)));

        assert!(store.catalog().is_empty());
        assert!(store.log().lines("reviews/A1").is_empty());
        assert_eq!(store.log().lines("customers").len(), 1);
    }

    #[test]
    fn failed_write_keeps_the_mutation_in_memory() {
        let mut store = store();
        store.register_customer("a1", "Alice").unwrap();
        store.log().set_fail_writes(true);

        let result = store.submit_review("p1", "Widget", "a1", 5.0, "Great");
        assert!(matches!(result, Err(StoreError::Persistence(_))));
        assert_eq!(store.catalog().find("P1").unwrap().review_count(), 1);

        let result = store.register_customer("b2", "Bob");
        assert!(matches!(result, Err(StoreError::Persistence(_))));
        assert!(store.login("B2").is_ok());
    }

    #[test]
    fn unknown_lookups_are_not_found() {
        let mut store = store();
        assert!(matches!(domain_error(store.login("ghost")), DomainError::NotFound(_)));
        assert!(matches!(
            domain_error(store.search_product("nothing")),
            DomainError::NotFound(_)
        ));
        assert!(store.search_history().is_empty());
    }

    #[test]
    fn search_history_respects_capacity() {
        let config = StoreConfig::default().with_search_history(2);
        let mut store = ReviewStore::with_log(InMemoryEventLog::new(), config).unwrap();
        store.register_customer("a1", "Alice").unwrap();
        store.submit_review("p1", "Widget", "a1", 4.0, "").unwrap();
        store.submit_review("p2", "Gadget", "a1", 3.0, "").unwrap();

        store.search_product("p1").unwrap();
        store.search_product("p2").unwrap();
        store.search_product("p1").unwrap();

        assert_eq!(
            store.search_history(),
            &[ProductId::new("P1"), ProductId::new("P2")]
        );
    }

    #[test]
    fn reopening_the_same_log_restores_state() {
        let mut store = store();
        store.register_customer("a1", "Alice").unwrap();
        store.register_customer("b2", "Bob").unwrap();
        store.submit_review("p1", "Widget", "a1", 4.5, "Good").unwrap();
        store.submit_review("p1", "Widget", "b2", 3.5, "Meh").unwrap();
        store.submit_review("p2", "Gadget", "b2", 2.0, "Poor").unwrap();

        let before: Vec<(String, usize, f64)> = store
            .catalog()
            .iter()
            .map(|p| (p.id().to_string(), p.review_count(), p.average_rating()))
            .collect();
        let log = store.into_log();
        let lines_before = log.lines("reviews/B2").len();

        let reopened = ReviewStore::with_log(log, StoreConfig::default()).unwrap();
        let after: Vec<(String, usize, f64)> = reopened
            .catalog()
            .iter()
            .map(|p| (p.id().to_string(), p.review_count(), p.average_rating()))
            .collect();

        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.0, a.0);
            assert_eq!(b.1, a.1);
            assert!((b.2 - a.2).abs() < 1e-9);
        }
        assert_eq!(reopened.replay_report().reviews_replayed, 3);
        assert_eq!(reopened.replay_report().customers_loaded, 2);
        assert_eq!(reopened.log().lines("reviews/B2").len(), lines_before);
    }

    #[test]
    fn submitted_timestamps_match_their_replayed_form() {
        let mut store = store();
        store.register_customer("a1", "Alice").unwrap();
        let occurred_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 15).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);

        let entry = store
            .submit(SubmitReview {
                product_id: "p1".to_string(),
                product_name: "Widget".to_string(),
                customer_id: "a1".to_string(),
                rating: 4.0,
                text: "Good".to_string(),
                occurred_at,
            })
            .unwrap();
        assert_eq!(entry.submitted_at, occurred_at.trunc_subsecs(0));
        let live = store.catalog().find("p1").unwrap().reviews()[0].clone();
        assert_eq!(live.submitted_at.timestamp_subsec_nanos(), 0);

        let reopened = ReviewStore::with_log(store.into_log(), StoreConfig::default()).unwrap();
        let replayed = &reopened.catalog().find("p1").unwrap().reviews()[0];
        assert_eq!(replayed, &live);
    }

    #[test]
    fn configured_ceilings_reach_the_domain() {
        let config = StoreConfig::default()
            .with_max_products(1)
            .with_max_reviews_per_product(3);
        let mut store = ReviewStore::with_log(InMemoryEventLog::new(), config.clone()).unwrap();
        assert_eq!(store.config(), &config);
        assert_eq!(store.catalog().limits(), config.catalog_limits());

        store.register_customer("a1", "Alice").unwrap();
        store.submit_review("p1", "Widget", "a1", 4.0, "").unwrap();
        assert!(matches!(
            domain_error(store.submit_review("p2", "Gadget", "a1", 4.0, "")),
            DomainError::CapacityExceeded(_)
        ));
        assert!(store.catalog().get(&ProductId::new("P2")).is_none());
    }

    #[test]
    fn top_rated_goes_through_the_catalog() {
        let mut store = store();
        store.register_customer("a1", "Alice").unwrap();
        store.submit_review("p1", "Widget", "a1", 2.0, "").unwrap();
        store.submit_review("p2", "Gadget", "a1", 5.0, "").unwrap();

        let top = store.top_rated(1).unwrap();
        assert_eq!(top[0].name(), "Gadget");
        assert!(matches!(
            domain_error(store.top_rated(3)),
            DomainError::InvalidCount { requested: 3, available: 2 }
        ));
    }
}
