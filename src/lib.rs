//! stripe-plans - Declare billing plans in code and reconcile them remotely
//!
//! Plans are declared once, at startup, with a name and a configuration
//! closure. Declared plans are validated, registered in a process-wide
//! registry, and can later be pushed to the billing API: a plan that does
//! not exist remotely is created, one that exists is left alone.
//!
//! # Features
//!
//! - **Declaration**: builder with defaults and field validation
//! - **Registry**: ordered, case-insensitive and constant-name lookup
//! - **Reconciliation**: create-if-absent with a payload shaped by API version
//! - **Testing**: in-memory [`MockPlanClient`] behind the `test-client` feature
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stripe_plans::{self, Config, Reconciler};
//!
//! #[tokio::main]
//! async fn main() -> stripe_plans::Result<()> {
//!     stripe_plans::init_tracing();
//!
//!     stripe_plans::plan("gold", |plan| {
//!         plan.name("Solid Gold").amount(699).interval("month");
//!     })?;
//!
//!     let config = Config::from_env()?;
//!     let reconciler = Reconciler::from_config(MyStripeClient::new(), &config)?;
//!     reconciler.put_all(stripe_plans::registry()).await?;
//!     Ok(())
//! }
//! ```

#![allow(async_fn_in_trait)] // PlanClient is implemented by callers; Send bounds are left to them

mod config;
mod error;
pub mod plans;
pub mod remote;
mod utils;

// Re-exports for public API
pub use config::{ApiConfig, Config, ConfigBuilder, LoggingConfig};
pub use error::{PlanError, Result};
pub use plans::{
    plan, registry, Interval, Metadata, MetadataValue, PlanBuilder, PlanDefinition, PlanKey,
    PlanRegistry,
};
pub use remote::{
    ApiVersion, CreatePlanPayload, PayloadShape, PlanClient, PutOutcome, Reconciler,
    RemoteError, RemotePlan, VersionPolicy, VersionTable,
};

#[cfg(any(test, feature = "test-client"))]
pub use remote::MockPlanClient;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "stripe_plans=debug")
/// - `STRIPE_PLANS_LOG_JSON`: Set to "true" for JSON formatted logs
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = utils::get_env_with_prefix("LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    install_subscriber(env_filter, json_logs);
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);
    install_subscriber(env_filter, config.logging.json);
}

fn install_subscriber(env_filter: EnvFilter, json: bool) {
    let result = if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
