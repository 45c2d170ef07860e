use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reviewdesk_core::{CustomerId, Entity};
use reviewdesk_events::Event;

/// Entity: Customer.
///
/// Created by registration, immutable afterwards, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Event: CustomerRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRegistered {
    pub customer_id: CustomerId,
    pub name: String,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl Event for CustomerRegistered {
    fn event_type(&self) -> &'static str {
        "customers.customer.registered"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> Option<DateTime<Utc>> {
        self.occurred_at
    }
}

impl From<&CustomerRegistered> for Customer {
    fn from(event: &CustomerRegistered) -> Self {
        Customer::new(event.customer_id.clone(), event.name.clone())
    }
}
