//! Mutable plan builder handed to declaration closures.
//!
//! ```rust,ignore
//! let definition = PlanBuilder::build("primo", |plan| {
//!     plan.name("Acme as a service PRIMO")
//!         .amount(699)
//!         .interval("month")
//!         .interval_count(3)
//!         .trial_period_days(30)
//!         .metadata_entry("number_of_awesome_things", 5)
//!         .statement_descriptor("Acme Primo");
//! })?;
//! ```

use super::definition::PlanDefinition;
use super::interval::Interval;
use super::metadata::{Metadata, MetadataValue};
use super::validation::{validate_attributes, validate_plan_id};
use crate::error::{PlanError, Result};

/// Default currency for plans that do not set one.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Default number of intervals between billings.
pub const DEFAULT_INTERVAL_COUNT: u32 = 1;

/// Default trial length.
pub const DEFAULT_TRIAL_PERIOD_DAYS: u32 = 0;

/// Candidate attribute set accumulated by a [`PlanBuilder`].
///
/// Every field is optional until the builder seals; mandatory fields are
/// enforced by the validator, not by the type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanAttributes {
    pub name: Option<String>,
    pub amount: Option<u64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
    pub interval_count: Option<u32>,
    pub trial_period_days: Option<u32>,
    pub metadata: Option<Metadata>,
    pub statement_descriptor: Option<String>,
}

impl PlanAttributes {
    /// Fill unset optional fields with their defaults.
    ///
    /// `metadata` and `statement_descriptor` stay absent.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.currency.get_or_insert_with(|| DEFAULT_CURRENCY.to_string());
        self.interval_count.get_or_insert(DEFAULT_INTERVAL_COUNT);
        self.trial_period_days.get_or_insert(DEFAULT_TRIAL_PERIOD_DAYS);
        self
    }
}

/// Builder for a single plan definition.
///
/// Setters only record values; nothing is checked until [`PlanBuilder::seal`].
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    identifier: String,
    attrs: PlanAttributes,
}

impl PlanBuilder {
    /// Start a plan from its declaration name.
    ///
    /// The identifier is the trimmed, lower-cased declaration name.
    #[must_use]
    pub fn new(declaration_name: &str) -> Self {
        Self {
            identifier: canonical_identifier(declaration_name),
            attrs: PlanAttributes::default(),
        }
    }

    /// Run a configuration closure against a fresh builder and seal it.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidConfiguration` if the configured plan is invalid.
    pub fn build<F>(declaration_name: &str, configure: F) -> Result<PlanDefinition>
    where
        F: FnOnce(&mut PlanBuilder),
    {
        let mut builder = Self::new(declaration_name);
        configure(&mut builder);
        builder.seal()
    }

    /// The identifier this builder will seal under.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The attributes recorded so far.
    #[must_use]
    pub fn attributes(&self) -> &PlanAttributes {
        &self.attrs
    }

    /// Set the display name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.attrs.name = Some(name.into());
        self
    }

    /// Set the price in the smallest currency unit (e.g. cents).
    pub fn amount(&mut self, amount: u64) -> &mut Self {
        self.attrs.amount = Some(amount);
        self
    }

    /// Set the currency code (e.g., "usd", "cad", "eur").
    pub fn currency(&mut self, currency: &str) -> &mut Self {
        self.attrs.currency = Some(currency.trim().to_lowercase());
        self
    }

    /// Set the billing interval.
    ///
    /// Accepts either text (`"month"`) or an [`Interval`]. Unknown values are
    /// rejected when the builder seals.
    pub fn interval(&mut self, interval: impl Into<String>) -> &mut Self {
        self.attrs.interval = Some(interval.into());
        self
    }

    /// Set the number of intervals between billings.
    pub fn interval_count(&mut self, count: u32) -> &mut Self {
        self.attrs.interval_count = Some(count);
        self
    }

    /// Set the trial period in days.
    pub fn trial_period_days(&mut self, days: u32) -> &mut Self {
        self.attrs.trial_period_days = Some(days);
        self
    }

    /// Replace the whole metadata map.
    pub fn metadata(&mut self, metadata: Metadata) -> &mut Self {
        self.attrs.metadata = Some(metadata);
        self
    }

    /// Add a single metadata entry.
    pub fn metadata_entry(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> &mut Self {
        self.attrs
            .metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set the statement descriptor shown on customer card statements.
    pub fn statement_descriptor(&mut self, descriptor: impl Into<String>) -> &mut Self {
        self.attrs.statement_descriptor = Some(descriptor.into());
        self
    }

    /// Apply defaults, validate and freeze into a [`PlanDefinition`].
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidConfiguration` naming every violated rule.
    pub fn seal(self) -> Result<PlanDefinition> {
        validate_plan_id(&self.identifier)?;

        let attrs = self.attrs.with_defaults();
        validate_attributes(&self.identifier, &attrs)?;

        let PlanAttributes {
            name: Some(name),
            amount: Some(amount),
            currency: Some(currency),
            interval: Some(interval),
            interval_count: Some(interval_count),
            trial_period_days: Some(trial_period_days),
            metadata,
            statement_descriptor,
        } = attrs
        else {
            return Err(PlanError::config(format!(
                "plan '{}' passed validation with unset fields",
                self.identifier
            )));
        };

        let interval: Interval = interval.parse().map_err(|_| {
            PlanError::config(format!(
                "plan '{}' passed validation with interval '{}'",
                self.identifier, interval
            ))
        })?;

        Ok(PlanDefinition {
            identifier: self.identifier,
            name,
            amount,
            currency,
            interval,
            interval_count,
            trial_period_days,
            metadata,
            statement_descriptor,
        })
    }
}

/// Canonical registry form of a plan name.
pub(crate) fn canonical_identifier(name: &str) -> String {
    name.trim().to_lowercase()
}
