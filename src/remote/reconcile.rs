//! Create-if-absent reconciliation of plan definitions.
//!
//! Remote existence is the only thing compared. A plan that exists remotely
//! is left alone even if its attributes have drifted from the definition;
//! a plan that does not exist is created exactly once.

use super::client::{PlanClient, RemotePlan};
use super::payload::CreatePlanPayload;
use super::version::{ApiVersion, PayloadShape, VersionPolicy};
use crate::config::Config;
use crate::error::Result;
use crate::plans::{PlanDefinition, PlanRegistry};

/// Result of reconciling one plan.
#[derive(Debug, Clone, PartialEq)]
pub enum PutOutcome {
    /// The plan was missing and has been created.
    Created(RemotePlan),
    /// The plan already existed; nothing was sent.
    Existing(RemotePlan),
}

impl PutOutcome {
    #[must_use]
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// The remote snapshot, created or pre-existing.
    #[must_use]
    pub fn remote(&self) -> &RemotePlan {
        match self {
            Self::Created(plan) | Self::Existing(plan) => plan,
        }
    }

    #[must_use]
    pub fn into_remote(self) -> RemotePlan {
        match self {
            Self::Created(plan) | Self::Existing(plan) => plan,
        }
    }
}

/// Reconciles plan definitions against the remote API.
///
/// # Example
///
/// ```rust,ignore
/// use stripe_plans::{Config, Reconciler};
///
/// let config = Config::from_env()?;
/// let reconciler = Reconciler::from_config(client, &config)?;
///
/// let outcome = reconciler.put(&gold).await?;
/// if outcome.was_created() {
///     println!("created {}", outcome.remote().id);
/// }
/// ```
pub struct Reconciler<C: PlanClient> {
    client: C,
    policy: VersionPolicy,
    api_version: Option<ApiVersion>,
}

impl<C: PlanClient> Reconciler<C> {
    /// Create a reconciler with no locally configured API version.
    #[must_use]
    pub fn new(client: C, policy: VersionPolicy) -> Self {
        Self {
            client,
            policy,
            api_version: None,
        }
    }

    /// Create a reconciler from application configuration.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidApiVersion` if a configured version does not parse.
    pub fn from_config(client: C, config: &Config) -> Result<Self> {
        Ok(Self::new(client, config.version_policy()?).with_api_version(config.api_version()?))
    }

    /// Pin the API version used to pick the payload shape.
    #[must_use]
    pub fn with_api_version(mut self, version: Option<ApiVersion>) -> Self {
        self.api_version = version;
        self
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    #[must_use]
    pub fn policy(&self) -> &VersionPolicy {
        &self.policy
    }

    /// Create `definition` remotely unless a plan with its ID already exists.
    ///
    /// # Errors
    ///
    /// Any remote error other than not-found on retrieve is returned as
    /// `PlanError::Remote`, unchanged. Nothing is retried.
    pub async fn put(&self, definition: &PlanDefinition) -> Result<PutOutcome> {
        let plan_id = definition.identifier();

        match self.client.retrieve_plan(plan_id).await {
            Ok(existing) => {
                tracing::debug!(
                    target: "stripe_plans::reconcile",
                    plan_id = %plan_id,
                    "plan already exists remotely, skipping"
                );
                Ok(PutOutcome::Existing(existing))
            }
            Err(err) if err.is_not_found() => {
                let shape = self.resolve_shape().await?;
                let payload = CreatePlanPayload::from_definition(definition, shape);
                let created = self.client.create_plan(&payload).await.map_err(|err| {
                    tracing::error!(
                        target: "stripe_plans::reconcile",
                        plan_id = %plan_id,
                        error = %err,
                        "failed to create plan"
                    );
                    err
                })?;

                tracing::info!(
                    target: "stripe_plans::reconcile",
                    plan_id = %plan_id,
                    shape = %shape,
                    "plan created"
                );
                Ok(PutOutcome::Created(created))
            }
            Err(err) => {
                tracing::error!(
                    target: "stripe_plans::reconcile",
                    plan_id = %plan_id,
                    error = %err,
                    "failed to retrieve plan"
                );
                Err(err.into())
            }
        }
    }

    /// Reconcile every registered plan in declaration order.
    ///
    /// Stops at the first error; plans reconciled before it stay reconciled.
    pub async fn put_all(&self, registry: &PlanRegistry) -> Result<Vec<PutOutcome>> {
        let plans = registry.all();
        let mut outcomes = Vec::with_capacity(plans.len());
        for plan in &plans {
            outcomes.push(self.put(plan).await?);
        }

        let created = outcomes.iter().filter(|o| o.was_created()).count();
        tracing::info!(
            target: "stripe_plans::reconcile",
            total = outcomes.len(),
            created = created,
            "plans reconciled"
        );
        Ok(outcomes)
    }

    /// Payload shape for the next create call.
    ///
    /// Uses the configured version, else the account's pinned version, else
    /// the policy's default for an unset version.
    pub async fn resolve_shape(&self) -> Result<PayloadShape> {
        if let Some(version) = &self.api_version {
            return Ok(self.policy.shape(Some(version)));
        }

        let account_version = match self.client.account_api_version().await? {
            Some(raw) => Some(ApiVersion::parse(&raw)?),
            None => None,
        };
        if let Some(version) = &account_version {
            tracing::debug!(
                target: "stripe_plans::reconcile",
                api_version = %version,
                "using account API version"
            );
        }
        Ok(self.policy.shape(account_version.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::plans::PlanBuilder;
    use crate::remote::client::test::MockPlanClient;
    use crate::remote::{RemoteError, VersionTable};
    use serde_json::json;

    fn policy() -> VersionPolicy {
        VersionPolicy::new(VersionTable::products_since(
            ApiVersion::parse("2018-02-05").unwrap(),
        ))
    }

    fn gold() -> PlanDefinition {
        PlanBuilder::build("gold", |plan| {
            plan.name("Solid Gold").amount(699).interval("month");
        })
        .unwrap()
    }

    fn nested_gold() -> serde_json::Value {
        json!({
            "id": "gold",
            "currency": "usd",
            "product": { "name": "Solid Gold", "statement_descriptor": null },
            "amount": 699,
            "interval": "month",
            "interval_count": 1,
            "trial_period_days": 0,
            "metadata": null,
        })
    }

    #[tokio::test]
    async fn test_creates_missing_plan_with_current_shape() {
        let reconciler = Reconciler::new(MockPlanClient::new(), policy());

        let outcome = reconciler.put(&gold()).await.unwrap();
        assert!(outcome.was_created());

        let payloads = reconciler.client().created_payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].to_value(), nested_gold());
    }

    #[tokio::test]
    async fn test_explicit_product_version() {
        let reconciler = Reconciler::new(MockPlanClient::new(), policy())
            .with_api_version(Some(ApiVersion::parse("2018-02-05").unwrap()));

        reconciler.put(&gold()).await.unwrap();
        assert_eq!(reconciler.client().created_payloads()[0].to_value(), nested_gold());
    }

    #[tokio::test]
    async fn test_old_version_uses_flat_shape() {
        let reconciler = Reconciler::new(MockPlanClient::new(), policy())
            .with_api_version(Some(ApiVersion::parse("2017-08-15").unwrap()));

        reconciler.put(&gold()).await.unwrap();
        assert_eq!(
            reconciler.client().created_payloads()[0].to_value(),
            json!({
                "id": "gold",
                "currency": "usd",
                "name": "Solid Gold",
                "amount": 699,
                "interval": "month",
                "interval_count": 1,
                "trial_period_days": 0,
                "metadata": null,
                "statement_descriptor": null,
            })
        );
    }

    #[tokio::test]
    async fn test_account_version_used_when_unset() {
        let client = MockPlanClient::new().with_account_version("2017-08-15");
        let reconciler = Reconciler::new(client, policy());

        reconciler.put(&gold()).await.unwrap();
        assert_eq!(
            reconciler.client().created_payloads()[0].shape(),
            PayloadShape::Flat
        );
    }

    #[tokio::test]
    async fn test_configured_version_beats_account_version() {
        let client = MockPlanClient::new().with_account_version("2017-08-15");
        let reconciler = Reconciler::new(client, policy())
            .with_api_version(Some(ApiVersion::parse("2019-12-03").unwrap()));

        assert_eq!(reconciler.resolve_shape().await.unwrap(), PayloadShape::NestedProduct);
    }

    #[tokio::test]
    async fn test_unparseable_account_version() {
        let client = MockPlanClient::new().with_account_version("not-a-version");
        let reconciler = Reconciler::new(client, policy());

        let err = reconciler.put(&gold()).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidApiVersion { .. }));
        assert_eq!(reconciler.client().create_calls(), 0);
    }

    #[tokio::test]
    async fn test_existing_plan_is_noop() {
        let client = MockPlanClient::new()
            .with_plan(RemotePlan::new("gold").with_name("Solid Gold"));
        let reconciler = Reconciler::new(client, policy());

        let outcome = reconciler.put(&gold()).await.unwrap();
        assert!(!outcome.was_created());
        assert_eq!(outcome.remote().name.as_deref(), Some("Solid Gold"));
        assert_eq!(reconciler.client().create_calls(), 0);
    }

    #[tokio::test]
    async fn test_existing_plan_with_drift_is_noop() {
        let client = MockPlanClient::new()
            .with_plan(RemotePlan::new("gold").with_name("Tarnished").with_amount(1));
        let reconciler = Reconciler::new(client, policy());

        let outcome = reconciler.put(&gold()).await.unwrap();
        assert_eq!(outcome.into_remote().amount, Some(1));
        assert_eq!(reconciler.client().create_calls(), 0);
    }

    #[tokio::test]
    async fn test_retrieve_failure_propagates() {
        let failure = RemoteError::Authentication {
            message: "Invalid API Key provided".to_string(),
        };
        let client = MockPlanClient::new().failing_retrieve(failure.clone());
        let reconciler = Reconciler::new(client, policy());

        let err = reconciler.put(&gold()).await.unwrap_err();
        assert_eq!(err.as_remote(), Some(&failure));
        assert_eq!(reconciler.client().create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_failure_propagates() {
        let failure = RemoteError::api("create_plan", "Invalid currency", Some(400));
        let client = MockPlanClient::new().failing_create(failure.clone());
        let reconciler = Reconciler::new(client, policy());

        let err = reconciler.put(&gold()).await.unwrap_err();
        assert_eq!(err.as_remote(), Some(&failure));
        assert_eq!(reconciler.client().create_calls(), 1);
        assert!(!reconciler.client().has_plan("gold"));
    }

    #[tokio::test]
    async fn test_second_put_is_noop() {
        let reconciler = Reconciler::new(MockPlanClient::new(), policy());
        let plan = gold();

        assert!(plan.put(&reconciler).await.unwrap().was_created());
        assert!(!plan.put(&reconciler).await.unwrap().was_created());
        assert_eq!(reconciler.client().create_calls(), 1);
        assert_eq!(reconciler.client().retrieve_calls(), 2);
    }

    #[tokio::test]
    async fn test_put_all_in_declaration_order() {
        let registry = PlanRegistry::new();
        registry
            .declare("gold", |plan| {
                plan.name("Solid Gold").amount(699).interval("month");
            })
            .unwrap();
        registry
            .declare("alternative_currency", |plan| {
                plan.name("Alternative Currency")
                    .amount(699)
                    .interval("month")
                    .currency("cad");
            })
            .unwrap();

        let client = MockPlanClient::new().with_plan(RemotePlan::new("gold"));
        let reconciler = Reconciler::new(client, policy());

        let outcomes = reconciler.put_all(&registry).await.unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].was_created());
        assert!(outcomes[1].was_created());

        let payloads = reconciler.client().created_payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].id(), "alternative_currency");
        assert_eq!(payloads[0].to_value()["currency"], "cad");
    }
}
