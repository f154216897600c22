//! Reconciliation against the remote billing API.
//!
//! [`Reconciler::put`] checks whether a plan exists remotely and creates it
//! if it does not. The create payload is shaped by a [`VersionPolicy`]
//! according to the API version in effect.
//!
//! ```rust,ignore
//! use stripe_plans::remote::{ApiVersion, Reconciler, VersionPolicy, VersionTable};
//!
//! let policy = VersionPolicy::new(VersionTable::products_since(
//!     ApiVersion::parse("2018-02-05")?,
//! ));
//! let reconciler = Reconciler::new(client, policy);
//!
//! reconciler.put_all(stripe_plans::registry()).await?;
//! ```

pub mod client;
pub mod error;
pub mod payload;
pub mod reconcile;
pub mod version;

pub use client::{PlanClient, RemotePlan};
pub use error::RemoteError;
pub use payload::{CreatePlanPayload, FlatPlanPayload, ProductPayload, ProductPlanPayload};
pub use reconcile::{PutOutcome, Reconciler};
pub use version::{ApiVersion, PayloadShape, VersionPolicy, VersionTable};

#[cfg(any(test, feature = "test-client"))]
pub use client::test::MockPlanClient;
