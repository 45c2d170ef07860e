use std::collections::HashMap;

use chrono::{DateTime, Utc};

use reviewdesk_core::field::ensure_present;
use reviewdesk_core::{CustomerId, DomainError, DomainResult};

use crate::customer::{Customer, CustomerRegistered};

/// Ordered collection of registered customers, keyed by normalized id.
///
/// Decision and mutation are split the same way as elsewhere in the domain:
/// [`CustomerRegistry::handle_register`] validates and returns the event without
/// touching state, [`CustomerRegistry::apply`] evolves state from an event. Replay
/// calls `apply` directly.
#[derive(Debug, Clone, Default)]
pub struct CustomerRegistry {
    customers: Vec<Customer>,
    index: HashMap<CustomerId, usize>,
    max_customers: Option<usize>,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that refuses registrations once `max` customers exist.
    pub fn with_max_customers(max: Option<usize>) -> Self {
        Self {
            max_customers: max,
            ..Self::default()
        }
    }

    /// Decide whether `id` can be registered as `name`.
    ///
    /// Does not mutate state.
    pub fn handle_register(
        &self,
        id: &str,
        name: &str,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<CustomerRegistered> {
        let customer_id: CustomerId = id.parse()?;
        ensure_present("customer name", name)?;

        if self.index.contains_key(&customer_id) {
            return Err(DomainError::duplicate_customer(customer_id.as_str()));
        }

        if let Some(max) = self.max_customers {
            if self.customers.len() >= max {
                return Err(DomainError::capacity(format!(
                    "customer limit of {max} reached"
                )));
            }
        }

        Ok(CustomerRegistered {
            customer_id,
            name: name.to_string(),
            occurred_at: Some(occurred_at),
        })
    }

    /// Evolve state from a registration event.
    ///
    /// Returns `false` (and changes nothing) when the id is already present: the
    /// first registration of an id wins.
    pub fn apply(&mut self, event: &CustomerRegistered) -> bool {
        if self.index.contains_key(&event.customer_id) {
            return false;
        }
        self.index
            .insert(event.customer_id.clone(), self.customers.len());
        self.customers.push(Customer::from(event));
        true
    }

    /// Validate and store a new customer in one step.
    pub fn register(
        &mut self,
        id: &str,
        name: &str,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<CustomerRegistered> {
        let event = self.handle_register(id, name, occurred_at)?;
        self.apply(&event);
        tracing::debug!(customer_id = %event.customer_id, "customer registered");
        Ok(event)
    }

    /// Look up a customer by raw (un-normalized) id.
    pub fn find(&self, id: &str) -> DomainResult<&Customer> {
        self.get(&CustomerId::new(id))
            .ok_or_else(|| DomainError::not_found(format!("customer {}", CustomerId::new(id))))
    }

    pub fn get(&self, id: &CustomerId) -> Option<&Customer> {
        self.index.get(id).map(|&idx| &self.customers[idx])
    }

    pub fn contains(&self, id: &CustomerId) -> bool {
        self.index.contains_key(id)
    }

    /// Customers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewdesk_core::Entity;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn register_then_find_is_case_insensitive() {
        let mut registry = CustomerRegistry::new();
        registry.register("cust01", "Alice", test_time()).unwrap();

        let found = registry.find("CUST01").unwrap();
        assert_eq!(found.id().as_str(), "CUST01");
        assert_eq!(found.name(), "Alice");
    }

    #[test]
    fn register_rejects_duplicate_normalized_id() {
        let mut registry = CustomerRegistry::new();
        registry.register("A1", "Alice", test_time()).unwrap();

        let err = registry.register("a1", "Someone Else", test_time()).unwrap_err();
        assert_eq!(err, DomainError::DuplicateCustomer("A1".to_string()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("A1").unwrap().name(), "Alice");
    }

    #[test]
    fn find_unknown_customer_is_not_found() {
        let registry = CustomerRegistry::new();
        match registry.find("nobody").unwrap_err() {
            DomainError::NotFound(_) => {}
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn register_rejects_invalid_fields() {
        let mut registry = CustomerRegistry::new();
        assert!(matches!(
            registry.register("", "Alice", test_time()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            registry.register("A1", "  ", test_time()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            registry.register("A1", "Al|ce", test_time()),
            Err(DomainError::Validation(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn register_respects_optional_capacity() {
        let mut registry = CustomerRegistry::with_max_customers(Some(1));
        registry.register("A1", "Alice", test_time()).unwrap();

        match registry.register("B2", "Bob", test_time()).unwrap_err() {
            DomainError::CapacityExceeded(_) => {}
            other => panic!("Expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn handle_register_does_not_mutate_state() {
        let registry = CustomerRegistry::new();
        let event = registry.handle_register("A1", "Alice", test_time()).unwrap();
        assert_eq!(event.customer_id.as_str(), "A1");
        assert!(registry.is_empty());
    }

    #[test]
    fn apply_keeps_first_occurrence() {
        let mut registry = CustomerRegistry::new();
        let first = CustomerRegistered {
            customer_id: CustomerId::new("a1"),
            name: "Alice".to_string(),
            occurred_at: None,
        };
        let second = CustomerRegistered {
            customer_id: CustomerId::new("A1"),
            name: "Impostor".to_string(),
            occurred_at: None,
        };

        assert!(registry.apply(&first));
        assert!(!registry.apply(&second));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("a1").unwrap().name(), "Alice");
    }

    #[test]
    fn iter_preserves_registration_order() {
        let mut registry = CustomerRegistry::new();
        for (id, name) in [("c3", "Carol"), ("a1", "Alice"), ("b2", "Bob")] {
            registry.register(id, name, test_time()).unwrap();
        }
        let ids: Vec<&str> = registry.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["C3", "A1", "B2"]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: whatever the casing, an id can be registered once.
            #[test]
            fn ids_are_unique_under_any_casing(id in "[a-zA-Z][a-zA-Z0-9]{0,11}") {
                let mut registry = CustomerRegistry::new();
                registry.register(&id.to_lowercase(), "First", Utc::now()).unwrap();
                let second = registry.register(&id.to_uppercase(), "Second", Utc::now());
                prop_assert!(
                    matches!(second, Err(DomainError::DuplicateCustomer(_))),
                    "expected DuplicateCustomer error"
                );
                prop_assert_eq!(registry.len(), 1);
            }
        }
    }
}
