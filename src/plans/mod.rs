//! Plan declaration: builder, validation and the registry.
//!
//! Plans are declared with a name and a configuration closure. The closure
//! receives a mutable [`PlanBuilder`]; once it returns, the builder applies
//! defaults, validates and seals the plan into an immutable
//! [`PlanDefinition`] that is then registered.
//!
//! ```rust,ignore
//! use stripe_plans::plans::PlanRegistry;
//!
//! let registry = PlanRegistry::new();
//! registry.declare("gold", |plan| {
//!     plan.name("Solid Gold").amount(699).interval("month");
//! })?;
//! ```

pub mod builder;
pub mod definition;
pub mod interval;
pub mod metadata;
pub mod registry;
pub mod validation;

pub use builder::{
    PlanAttributes, PlanBuilder, DEFAULT_CURRENCY, DEFAULT_INTERVAL_COUNT,
    DEFAULT_TRIAL_PERIOD_DAYS,
};
pub use definition::PlanDefinition;
pub use interval::{Interval, IntervalParseError};
pub use metadata::{Metadata, MetadataValue};
pub use registry::{plan, registry, PlanKey, PlanRegistry};
pub use validation::{
    check_attributes, validate_attributes, validate_plan_id, Violation,
    MAX_STATEMENT_DESCRIPTOR_LENGTH,
};
