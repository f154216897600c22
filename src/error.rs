use crate::plans::validation::Violation;
use crate::remote::RemoteError;

/// The main error type for plan declaration and reconciliation
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A plan failed validation when it was sealed.
    ///
    /// Raised synchronously by the declaration call, never deferred to
    /// reconciliation time.
    #[error("Invalid configuration for plan '{plan}': {}", join_violations(.violations))]
    InvalidConfiguration {
        plan: String,
        violations: Vec<Violation>,
    },

    #[error("Plan '{0}' is already registered")]
    DuplicateIdentifier(String),

    #[error("Invalid API version '{version}': {reason}")]
    InvalidApiVersion { version: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reported by the remote billing API, passed through unchanged.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Result type alias for plan operations
pub type Result<T> = std::result::Result<T, PlanError>;

impl PlanError {
    pub fn invalid_configuration(plan: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self::InvalidConfiguration {
            plan: plan.into(),
            violations,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error came from plan validation.
    #[must_use]
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }

    /// Check if this error is a registry collision.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateIdentifier(_))
    }

    /// Violated rules, if this is a validation failure.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidConfiguration { violations, .. } => violations,
            _ => &[],
        }
    }

    /// The underlying remote error, if any.
    #[must_use]
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
