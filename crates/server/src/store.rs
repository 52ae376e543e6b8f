//! Customer and message persistence.
//!
//! [`CustomerStore`] is the seam to the database; [`InMemoryStore`] backs
//! tests and single-process deployments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use intent::Plan;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("customer {0} not found")]
    CustomerNotFound(Uuid),
    #[error("store backend failure: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    /// Digits only.
    pub phone: String,
    pub name: Option<String>,
    pub wa_id: Option<String>,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub customer_id: Uuid,
    pub phone: String,
    pub direction: Direction,
    pub message_type: String,
    pub content: String,
    /// Normalized TON fields of an inbound message, as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ton_data: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    pub fn inbound_text(customer: &Customer, content: impl Into<String>, ton_data: Value) -> Self {
        Self {
            customer_id: customer.id,
            phone: customer.phone.clone(),
            direction: Direction::Inbound,
            message_type: "text".into(),
            content: content.into(),
            ton_data: Some(ton_data),
            created_at: Utc::now(),
        }
    }

    pub fn outbound_text(customer: &Customer, content: impl Into<String>) -> Self {
        Self {
            customer_id: customer.id,
            phone: customer.phone.clone(),
            direction: Direction::Outbound,
            message_type: "text".into(),
            content: content.into(),
            ton_data: None,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, StoreError>;

    /// Returns the customer for `phone`, creating it when absent (on the
    /// `basic` plan unless the store was configured otherwise). An existing
    /// customer is returned unchanged.
    async fn get_or_create_customer(
        &self,
        phone: &str,
        name: Option<&str>,
        wa_id: Option<&str>,
    ) -> Result<Customer, StoreError>;

    async fn record_message(&self, message: MessageRecord) -> Result<(), StoreError>;

    /// Messages of one customer, oldest first.
    async fn messages_for(&self, customer_id: Uuid) -> Result<Vec<MessageRecord>, StoreError>;

    async fn set_plan(&self, customer_id: Uuid, plan: Plan) -> Result<Customer, StoreError>;
}

/// Process-local store on concurrent maps.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    customers: DashMap<String, Customer>,
    phones: DashMap<Uuid, String>,
    messages: DashMap<Uuid, Vec<MessageRecord>>,
    default_plan: Plan,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan given to customers this store creates.
    pub fn with_default_plan(mut self, plan: Plan) -> Self {
        self.default_plan = plan;
        self
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }
}

#[async_trait]
impl CustomerStore for InMemoryStore {
    async fn find_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, StoreError> {
        Ok(self.customers.get(phone).map(|entry| entry.value().clone()))
    }

    async fn get_or_create_customer(
        &self,
        phone: &str,
        name: Option<&str>,
        wa_id: Option<&str>,
    ) -> Result<Customer, StoreError> {
        let customer = self
            .customers
            .entry(phone.to_string())
            .or_insert_with(|| {
                let customer = Customer {
                    id: Uuid::new_v4(),
                    phone: phone.to_string(),
                    name: name.filter(|n| !n.is_empty()).map(str::to_string),
                    wa_id: wa_id.map(str::to_string),
                    plan: self.default_plan,
                    created_at: Utc::now(),
                };
                tracing::info!(customer_id = %customer.id, phone = %phone, "customer_created");
                customer
            })
            .value()
            .clone();
        self.phones.insert(customer.id, customer.phone.clone());
        Ok(customer)
    }

    async fn record_message(&self, message: MessageRecord) -> Result<(), StoreError> {
        if !self.phones.contains_key(&message.customer_id) {
            return Err(StoreError::CustomerNotFound(message.customer_id));
        }
        self.messages
            .entry(message.customer_id)
            .or_default()
            .push(message);
        Ok(())
    }

    async fn messages_for(&self, customer_id: Uuid) -> Result<Vec<MessageRecord>, StoreError> {
        Ok(self
            .messages
            .get(&customer_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn set_plan(&self, customer_id: Uuid, plan: Plan) -> Result<Customer, StoreError> {
        let phone = self
            .phones
            .get(&customer_id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::CustomerNotFound(customer_id))?;
        let mut customer = self
            .customers
            .get_mut(&phone)
            .ok_or(StoreError::CustomerNotFound(customer_id))?;
        customer.plan = plan;
        Ok(customer.value().clone())
    }
}
