//! Process-wide plan registry.
//!
//! Sealed definitions are registered once, by identifier, and read back in
//! three ways:
//!
//! - in declaration order via [`PlanRegistry::all`]
//! - by textual or symbolic key via [`PlanRegistry::lookup`]
//! - through fixed names (`GOLD`) via [`PlanKey`] constants or
//!   [`PlanRegistry::lookup_constant`]
//!
//! All three read the same map; fixed names are derived from identifiers and
//! never stored separately.
//!
//! ```rust,ignore
//! use stripe_plans::{plan, plan_keys};
//!
//! plan_keys! {
//!     pub GOLD => "gold",
//! }
//!
//! plan("gold", |plan| {
//!     plan.name("Solid Gold").amount(699).interval("month");
//! })?;
//!
//! let gold = GOLD.get().expect("declared above");
//! assert_eq!(stripe_plans::registry().lookup("GOLD"), Some(gold));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::builder::{canonical_identifier, PlanBuilder};
use super::definition::PlanDefinition;
use crate::error::{PlanError, Result};

/// Insertion-ordered collection of sealed plans.
///
/// Writes are serialized behind a single lock so the identifier uniqueness
/// check and the insert happen atomically.
#[derive(Debug, Default)]
pub struct PlanRegistry {
    inner: RwLock<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    plans: Vec<Arc<PlanDefinition>>,
    index: HashMap<String, usize>,
}

impl RegistryInner {
    fn reindex(&mut self) {
        self.index = self
            .plans
            .iter()
            .enumerate()
            .map(|(i, plan)| (plan.identifier().to_string(), i))
            .collect();
    }
}

impl PlanRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build, seal and register a plan in one step.
    ///
    /// Nothing is registered if validation fails.
    ///
    /// # Errors
    ///
    /// - `PlanError::InvalidConfiguration` if the plan does not validate
    /// - `PlanError::DuplicateIdentifier` if the identifier is taken
    pub fn declare<F>(&self, declaration_name: &str, configure: F) -> Result<Arc<PlanDefinition>>
    where
        F: FnOnce(&mut PlanBuilder),
    {
        let definition = PlanBuilder::build(declaration_name, configure)?;
        self.register(definition)
    }

    /// Register a sealed definition.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::DuplicateIdentifier` if the identifier is taken.
    pub fn register(&self, definition: PlanDefinition) -> Result<Arc<PlanDefinition>> {
        let key = canonical_identifier(definition.identifier());
        let mut inner = self.write();

        if inner.index.contains_key(&key) {
            tracing::warn!(plan_id = %key, "rejected duplicate plan declaration");
            return Err(PlanError::DuplicateIdentifier(key));
        }

        let definition = Arc::new(definition);
        let position = inner.plans.len();
        inner.plans.push(Arc::clone(&definition));
        inner.index.insert(key, position);

        tracing::debug!(
            plan_id = %definition.identifier(),
            amount = definition.amount(),
            interval = %definition.interval(),
            "plan registered"
        );

        Ok(definition)
    }

    /// All registered plans, in declaration order.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<PlanDefinition>> {
        self.read().plans.clone()
    }

    /// Look up a plan by key.
    ///
    /// Keys are compared in canonical form, so `"primo"`, `"PRIMO"` and the
    /// [`PlanKey`] `PRIMO` all resolve to the same plan.
    #[must_use]
    pub fn lookup(&self, key: impl AsRef<str>) -> Option<Arc<PlanDefinition>> {
        let key = canonical_identifier(key.as_ref());
        let inner = self.read();
        inner.index.get(&key).map(|&i| Arc::clone(&inner.plans[i]))
    }

    /// Look up a plan by its fixed accessor name (e.g. `"GOLD"`).
    ///
    /// Only the exact upper-case form matches.
    #[must_use]
    pub fn lookup_constant(&self, constant: &str) -> Option<Arc<PlanDefinition>> {
        if constant != constant.to_uppercase() {
            return None;
        }
        self.lookup(constant)
    }

    /// Fixed accessor table: `(constant name, plan)` in declaration order.
    #[must_use]
    pub fn constants(&self) -> Vec<(String, Arc<PlanDefinition>)> {
        self.read()
            .plans
            .iter()
            .map(|plan| (plan.constant_name(), Arc::clone(plan)))
            .collect()
    }

    /// Check if a plan is registered under `key`.
    #[must_use]
    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.read()
            .index
            .contains_key(&canonical_identifier(key.as_ref()))
    }

    /// Remove a plan.
    ///
    /// This is an administrative operation (e.g. test teardown); reconciliation
    /// never removes plans.
    pub fn remove(&self, key: impl AsRef<str>) -> Option<Arc<PlanDefinition>> {
        let key = canonical_identifier(key.as_ref());
        let mut inner = self.write();
        let position = inner.index.remove(&key)?;
        let removed = inner.plans.remove(position);
        inner.reindex();
        tracing::debug!(plan_id = %key, "plan removed from registry");
        Some(removed)
    }

    /// Get the number of plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().plans.len()
    }

    /// Check if there are no plans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().plans.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        // The inner map is always left consistent, so a poisoned lock is still usable.
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

static GLOBAL_REGISTRY: OnceLock<PlanRegistry> = OnceLock::new();

/// The process-wide registry, empty until the first declaration.
pub fn registry() -> &'static PlanRegistry {
    GLOBAL_REGISTRY.get_or_init(PlanRegistry::new)
}

/// Declare a plan in the process-wide registry.
///
/// # Errors
///
/// - `PlanError::InvalidConfiguration` if the plan does not validate
/// - `PlanError::DuplicateIdentifier` if the identifier is taken
///
/// # Example
///
/// ```rust,ignore
/// stripe_plans::plan("primo", |plan| {
///     plan.name("Acme as a service PRIMO")
///         .amount(699)
///         .interval("month");
/// })?;
/// ```
pub fn plan<F>(declaration_name: &str, configure: F) -> Result<Arc<PlanDefinition>>
where
    F: FnOnce(&mut PlanBuilder),
{
    registry().declare(declaration_name, configure)
}

/// Symbolic, compile-time-checked key for a registered plan.
///
/// Usually generated with [`plan_keys!`](crate::plan_keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanKey(&'static str);

impl PlanKey {
    #[must_use]
    pub const fn new(identifier: &'static str) -> Self {
        Self(identifier)
    }

    #[must_use]
    pub fn identifier(&self) -> &'static str {
        self.0
    }

    /// Fixed accessor name (`gold` -> `GOLD`).
    #[must_use]
    pub fn constant_name(&self) -> String {
        self.0.to_uppercase()
    }

    /// Resolve against the process-wide registry.
    #[must_use]
    pub fn get(&self) -> Option<Arc<PlanDefinition>> {
        registry().lookup(self)
    }

    /// Resolve against a specific registry.
    #[must_use]
    pub fn get_in(&self, registry: &PlanRegistry) -> Option<Arc<PlanDefinition>> {
        registry.lookup(self)
    }
}

impl AsRef<str> for PlanKey {
    fn as_ref(&self) -> &str {
        self.0
    }
}

/// Generate [`PlanKey`] constants for fixed-name plan access.
///
/// ```rust,ignore
/// stripe_plans::plan_keys! {
///     pub GOLD => "gold",
///     pub ALTERNATIVE_CURRENCY => "alternative_currency",
/// }
/// ```
#[macro_export]
macro_rules! plan_keys {
    ($($(#[$meta:meta])* $vis:vis $name:ident => $id:literal),* $(,)?) => {
        $(
            $(#[$meta])*
            $vis const $name: $crate::plans::PlanKey = $crate::plans::PlanKey::new($id);
        )*
    };
}
