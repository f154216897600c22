//! Remote billing API boundary.
//!
//! The crate does not talk HTTP itself. Callers supply a [`PlanClient`] that
//! wraps their API client of choice; transport, authentication, retries and
//! timeouts all live behind it.

use serde::{Deserialize, Serialize};

use super::error::RemoteError;
use super::payload::CreatePlanPayload;

/// Snapshot of a plan as the remote API reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePlan {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub interval_count: Option<u32>,
    /// Product ID, or the expanded product object.
    #[serde(default)]
    pub product: Option<serde_json::Value>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RemotePlan {
    /// A snapshot carrying only an ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            amount: None,
            currency: None,
            interval: None,
            interval_count: None,
            product: None,
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// Trait for the remote plan API.
///
/// `retrieve_plan` must report a missing plan as [`RemoteError::NotFound`];
/// that is the only error the reconciler acts on.
#[allow(async_fn_in_trait)]
pub trait PlanClient: Send + Sync {
    /// Fetch a plan by ID.
    async fn retrieve_plan(&self, id: &str) -> Result<RemotePlan, RemoteError>;

    /// Create a plan from a shaped payload.
    async fn create_plan(&self, payload: &CreatePlanPayload) -> Result<RemotePlan, RemoteError>;

    /// The API version the account is pinned to, if the client can tell.
    ///
    /// Consulted only when no version is configured locally.
    async fn account_api_version(&self) -> Result<Option<String>, RemoteError> {
        Ok(None)
    }
}

/// Mock plan client for testing.
#[cfg(any(test, feature = "test-client"))]
pub mod test {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::RwLock;

    /// In-memory plan client that records every create call.
    #[derive(Default)]
    pub struct MockPlanClient {
        plans: RwLock<HashMap<String, RemotePlan>>,
        created: RwLock<Vec<CreatePlanPayload>>,
        retrieve_calls: AtomicU64,
        retrieve_failure: RwLock<Option<RemoteError>>,
        create_failure: RwLock<Option<RemoteError>>,
        account_version: RwLock<Option<String>>,
    }

    impl MockPlanClient {
        /// Create a new mock client with no remote plans.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a plan that already exists remotely.
        #[must_use]
        pub fn with_plan(self, plan: RemotePlan) -> Self {
            self.plans.write().unwrap().insert(plan.id.clone(), plan);
            self
        }

        /// Report `version` as the account's pinned API version.
        #[must_use]
        pub fn with_account_version(self, version: &str) -> Self {
            *self.account_version.write().unwrap() = Some(version.to_string());
            self
        }

        /// Make every retrieve call fail with `error`.
        #[must_use]
        pub fn failing_retrieve(self, error: RemoteError) -> Self {
            *self.retrieve_failure.write().unwrap() = Some(error);
            self
        }

        /// Make every create call fail with `error`.
        #[must_use]
        pub fn failing_create(self, error: RemoteError) -> Self {
            *self.create_failure.write().unwrap() = Some(error);
            self
        }

        /// Payloads passed to `create_plan`, in call order.
        pub fn created_payloads(&self) -> Vec<CreatePlanPayload> {
            self.created.read().unwrap().clone()
        }

        /// Number of `create_plan` calls, including failed ones.
        pub fn create_calls(&self) -> usize {
            self.created.read().unwrap().len()
        }

        /// Number of `retrieve_plan` calls.
        pub fn retrieve_calls(&self) -> u64 {
            self.retrieve_calls.load(Ordering::SeqCst)
        }

        /// Check if a plan exists in the mock's remote store.
        pub fn has_plan(&self, id: &str) -> bool {
            self.plans.read().unwrap().contains_key(id)
        }
    }

    impl PlanClient for MockPlanClient {
        async fn retrieve_plan(&self, id: &str) -> Result<RemotePlan, RemoteError> {
            self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.retrieve_failure.read().unwrap().clone() {
                return Err(err);
            }
            self.plans
                .read()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| RemoteError::not_found(id))
        }

        async fn create_plan(&self, payload: &CreatePlanPayload) -> Result<RemotePlan, RemoteError> {
            self.created.write().unwrap().push(payload.clone());
            if let Some(err) = self.create_failure.read().unwrap().clone() {
                return Err(err);
            }

            let body = payload.to_value();
            let mut plan: RemotePlan = serde_json::from_value(body)
                .map_err(|e| RemoteError::api("create_plan", e.to_string(), Some(400)))?;
            if let Some(product) = plan.product.take() {
                plan.name = product["name"].as_str().map(String::from);
                plan.product = Some(serde_json::Value::String(format!("prod_{}", plan.id)));
            }

            self.plans
                .write()
                .unwrap()
                .insert(plan.id.clone(), plan.clone());
            Ok(plan)
        }

        async fn account_api_version(&self) -> Result<Option<String>, RemoteError> {
            Ok(self.account_version.read().unwrap().clone())
        }
    }
}
