//! Sealed plan definitions.

use serde::Serialize;

use super::interval::Interval;
use super::metadata::Metadata;
use crate::error::Result;
use crate::remote::{PlanClient, PutOutcome, Reconciler};

/// A validated, immutable plan.
///
/// Only [`PlanBuilder::seal`](super::PlanBuilder::seal) constructs these, and
/// nothing mutates one afterwards. Definitions are shared as
/// `Arc<PlanDefinition>` through the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanDefinition {
    pub(super) identifier: String,
    pub(super) name: String,
    pub(super) amount: u64,
    pub(super) currency: String,
    pub(super) interval: Interval,
    pub(super) interval_count: u32,
    pub(super) trial_period_days: u32,
    pub(super) metadata: Option<Metadata>,
    pub(super) statement_descriptor: Option<String>,
}

impl PlanDefinition {
    /// Registry identifier, also used as the remote plan ID.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price in the smallest currency unit.
    #[must_use]
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Lower-case currency code.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    #[must_use]
    pub fn interval_count(&self) -> u32 {
        self.interval_count
    }

    #[must_use]
    pub fn trial_period_days(&self) -> u32 {
        self.trial_period_days
    }

    #[must_use]
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    #[must_use]
    pub fn statement_descriptor(&self) -> Option<&str> {
        self.statement_descriptor.as_deref()
    }

    /// Fixed accessor name for this plan (`gold` -> `GOLD`).
    #[must_use]
    pub fn constant_name(&self) -> String {
        self.identifier.to_uppercase()
    }

    /// Create this plan remotely unless it already exists.
    ///
    /// Shorthand for [`Reconciler::put`].
    pub async fn put<C: PlanClient>(&self, reconciler: &Reconciler<C>) -> Result<PutOutcome> {
        reconciler.put(self).await
    }
}
