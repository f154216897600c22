//! Attribute validation for plan declarations.
//!
//! Every check here is a pure function over a [`PlanAttributes`] candidate.
//! [`check_attributes`] collects all violated rules so a single failed
//! declaration reports everything that is wrong with it at once.
//!
//! ```rust,ignore
//! use stripe_plans::plans::validation::{check_attributes, validate_attributes};
//!
//! let violations = check_attributes(&attrs);
//! validate_attributes("gold", &attrs)?;
//! ```

use std::fmt;

use super::builder::PlanAttributes;
use super::interval::Interval;
use super::metadata::Metadata;
use crate::error::{PlanError, Result};

/// Maximum length for a statement descriptor, in characters.
pub const MAX_STATEMENT_DESCRIPTOR_LENGTH: usize = 22;

/// Maximum length for plan identifiers.
const MAX_PLAN_ID_LENGTH: usize = 64;

/// Maximum number of metadata keys.
const MAX_METADATA_KEYS: usize = 50;

/// Maximum length for a metadata key.
const MAX_METADATA_KEY_LENGTH: usize = 40;

/// Maximum length for a rendered metadata value.
const MAX_METADATA_VALUE_LENGTH: usize = 500;

/// A single violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub reason: String,
}

impl Violation {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Check a candidate attribute set, returning every violated rule.
///
/// An empty vector means the candidate is valid.
#[must_use]
pub fn check_attributes(attrs: &PlanAttributes) -> Vec<Violation> {
    let mut violations = Vec::new();

    match attrs.name.as_deref() {
        None => violations.push(Violation::new("name", "is required")),
        Some(name) if name.trim().is_empty() => {
            violations.push(Violation::new("name", "cannot be blank"))
        }
        Some(_) => {}
    }

    if attrs.amount.is_none() {
        violations.push(Violation::new("amount", "is required"));
    }

    match attrs.interval.as_deref() {
        None => violations.push(Violation::new("interval", "is required")),
        Some(value) => {
            if let Err(err) = value.parse::<Interval>() {
                violations.push(Violation::new("interval", err.to_string()));
            }
        }
    }

    if let Some(currency) = attrs.currency.as_deref() {
        if let Some(reason) = check_currency(currency) {
            violations.push(Violation::new("currency", reason));
        }
    }

    if attrs.interval_count == Some(0) {
        violations.push(Violation::new("interval_count", "must be at least 1"));
    }

    if let Some(descriptor) = attrs.statement_descriptor.as_deref() {
        if let Some(reason) = check_statement_descriptor(descriptor) {
            violations.push(Violation::new("statement_descriptor", reason));
        }
    }

    if let Some(metadata) = attrs.metadata.as_ref() {
        violations.extend(check_metadata(metadata));
    }

    violations
}

/// Validate a candidate attribute set for the plan `identifier`.
///
/// # Errors
///
/// Returns `PlanError::InvalidConfiguration` listing every violated rule.
pub fn validate_attributes(identifier: &str, attrs: &PlanAttributes) -> Result<()> {
    let violations = check_attributes(attrs);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(PlanError::invalid_configuration(identifier, violations))
    }
}

/// Validate a plan identifier.
///
/// Identifiers must:
/// - Not be empty
/// - Not exceed 64 characters
/// - Contain only alphanumeric characters, underscores, and hyphens
///
/// # Errors
///
/// Returns `PlanError::InvalidConfiguration` if validation fails.
pub fn validate_plan_id(id: &str) -> Result<()> {
    let reason = if id.is_empty() {
        Some("cannot be empty".to_string())
    } else if id.len() > MAX_PLAN_ID_LENGTH {
        Some(format!("exceeds maximum length of {}", MAX_PLAN_ID_LENGTH))
    } else if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Some("contains invalid characters (only alphanumeric, underscore, and hyphen allowed)".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(PlanError::invalid_configuration(
            sanitize_for_error(id),
            vec![Violation::new("id", reason)],
        )),
        None => Ok(()),
    }
}

fn check_statement_descriptor(descriptor: &str) -> Option<String> {
    let length = descriptor.chars().count();
    if length > MAX_STATEMENT_DESCRIPTOR_LENGTH {
        Some(format!(
            "is {} characters, maximum is {}",
            length, MAX_STATEMENT_DESCRIPTOR_LENGTH
        ))
    } else {
        None
    }
}

fn check_currency(currency: &str) -> Option<String> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_lowercase()) {
        None
    } else {
        Some(format!(
            "'{}' is not a three-letter lower-case ISO code",
            sanitize_for_error(currency)
        ))
    }
}

fn check_metadata(metadata: &Metadata) -> Vec<Violation> {
    let mut violations = Vec::new();

    if metadata.len() > MAX_METADATA_KEYS {
        violations.push(Violation::new(
            "metadata",
            format!("has {} keys, maximum is {}", metadata.len(), MAX_METADATA_KEYS),
        ));
    }

    for (key, value) in metadata {
        if key.is_empty() || key.chars().count() > MAX_METADATA_KEY_LENGTH {
            violations.push(Violation::new(
                "metadata",
                format!(
                    "key '{}' must be 1 to {} characters",
                    sanitize_for_error(key),
                    MAX_METADATA_KEY_LENGTH
                ),
            ));
        }
        if value.to_string().chars().count() > MAX_METADATA_VALUE_LENGTH {
            violations.push(Violation::new(
                "metadata",
                format!(
                    "value for '{}' exceeds {} characters",
                    sanitize_for_error(key),
                    MAX_METADATA_VALUE_LENGTH
                ),
            ));
        }
    }

    violations
}

/// Sanitize a string for error messages to prevent log injection.
fn sanitize_for_error(s: &str) -> String {
    let sanitized: String = s
        .chars()
        .take(50)
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
        .collect();

    if s.chars().count() > 50 {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_attrs() -> PlanAttributes {
        PlanAttributes {
            name: Some("Acme as a service".to_string()),
            amount: Some(999),
            interval: Some("month".to_string()),
            ..PlanAttributes::default()
        }
        .with_defaults()
    }

    fn fields(violations: &[Violation]) -> Vec<&'static str> {
        violations.iter().map(|v| v.field).collect()
    }

    #[test]
    fn test_valid_attributes() {
        assert!(check_attributes(&valid_attrs()).is_empty());
        assert!(validate_attributes("described", &valid_attrs()).is_ok());
    }

    #[test]
    fn test_missing_mandatory_fields() {
        let violations = check_attributes(&PlanAttributes::default().with_defaults());
        assert_eq!(fields(&violations), vec!["name", "amount", "interval"]);
    }

    #[test]
    fn test_each_interval_accepted() {
        for interval in ["day", "week", "month", "year"] {
            let attrs = PlanAttributes {
                interval: Some(interval.to_string()),
                ..valid_attrs()
            };
            assert!(check_attributes(&attrs).is_empty(), "{} rejected", interval);
        }
    }

    #[test]
    fn test_arbitrary_interval_rejected() {
        let attrs = PlanAttributes {
            interval: Some("anything".to_string()),
            ..valid_attrs()
        };
        let err = validate_attributes("broken", &attrs).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert_eq!(fields(err.violations()), vec!["interval"]);
    }

    #[test]
    fn test_statement_descriptor_limit() {
        let accepted = PlanAttributes {
            statement_descriptor: Some("ACME Monthly".to_string()),
            ..valid_attrs()
        };
        assert!(check_attributes(&accepted).is_empty());

        let at_limit = PlanAttributes {
            statement_descriptor: Some("x".repeat(MAX_STATEMENT_DESCRIPTOR_LENGTH)),
            ..valid_attrs()
        };
        assert!(check_attributes(&at_limit).is_empty());

        let too_long = PlanAttributes {
            statement_descriptor: Some("ACME as a Service Monthly".to_string()),
            ..valid_attrs()
        };
        let violations = check_attributes(&too_long);
        assert_eq!(fields(&violations), vec!["statement_descriptor"]);
        assert!(violations[0].reason.contains("25 characters"));
    }

    #[test]
    fn test_statement_descriptor_counts_characters() {
        // 22 multi-byte characters stay within the limit.
        let attrs = PlanAttributes {
            statement_descriptor: Some("é".repeat(22)),
            ..valid_attrs()
        };
        assert!(check_attributes(&attrs).is_empty());
    }

    #[test]
    fn test_zero_interval_count_rejected() {
        let attrs = PlanAttributes {
            interval_count: Some(0),
            ..valid_attrs()
        };
        assert_eq!(fields(&check_attributes(&attrs)), vec!["interval_count"]);
    }

    #[test]
    fn test_currency_format() {
        let attrs = PlanAttributes {
            currency: Some("dollars".to_string()),
            ..valid_attrs()
        };
        assert_eq!(fields(&check_attributes(&attrs)), vec!["currency"]);
    }

    #[test]
    fn test_blank_name_rejected() {
        let attrs = PlanAttributes {
            name: Some("   ".to_string()),
            ..valid_attrs()
        };
        assert_eq!(fields(&check_attributes(&attrs)), vec!["name"]);
    }

    #[test]
    fn test_metadata_limits() {
        let mut metadata = Metadata::new();
        metadata.insert("k".repeat(41), "v".into());
        metadata.insert("long".to_string(), "v".repeat(501).into());
        let attrs = PlanAttributes {
            metadata: Some(metadata),
            ..valid_attrs()
        };
        assert_eq!(fields(&check_attributes(&attrs)), vec!["metadata", "metadata"]);
    }

    #[test]
    fn test_check_is_repeatable() {
        let attrs = PlanAttributes {
            interval: Some("fortnight".to_string()),
            ..valid_attrs()
        };
        assert_eq!(check_attributes(&attrs), check_attributes(&attrs));
    }

    #[test]
    fn test_validate_plan_id() {
        assert!(validate_plan_id("gold").is_ok());
        assert!(validate_plan_id("alternative_currency").is_ok());
        assert!(validate_plan_id("pro-2024").is_ok());

        assert!(validate_plan_id("").is_err());
        assert!(validate_plan_id(&"a".repeat(65)).is_err());
        assert!(validate_plan_id("gold plan").is_err());
        assert!(validate_plan_id("gold<script>").is_err());
    }
}
