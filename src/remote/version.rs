//! API version policy.
//!
//! Decides how a create-plan request body is shaped for a given API version.
//! Older API versions take plan `name` and `statement_descriptor` at the top
//! level ([`PayloadShape::Flat`]); versions that introduced products expect
//! them nested under `product` ([`PayloadShape::NestedProduct`]).
//!
//! Where that boundary sits is not known here. It is supplied as a
//! [`VersionTable`], normally built from [`Config`](crate::Config).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PlanError, Result};

/// An API version such as `2018-02-05` or `2024-09-30.acacia`.
///
/// Versions are ordered by their release date; the release name suffix is
/// kept for display only.
#[derive(Debug, Clone)]
pub struct ApiVersion {
    date: NaiveDate,
    raw: String,
}

impl ApiVersion {
    /// Parse a version identifier.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidApiVersion` unless the identifier starts
    /// with a `YYYY-MM-DD` date, optionally followed by `.name`.
    pub fn parse(version: &str) -> Result<Self> {
        let raw = version.trim();
        let (date_part, suffix) = match raw.split_once('.') {
            Some((date, suffix)) => (date, Some(suffix)),
            None => (raw, None),
        };

        if suffix.is_some_and(str::is_empty) {
            return Err(PlanError::InvalidApiVersion {
                version: version.to_string(),
                reason: "empty release name after '.'".to_string(),
            });
        }

        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
            PlanError::InvalidApiVersion {
                version: version.to_string(),
                reason: format!("expected YYYY-MM-DD ({})", e),
            }
        })?;

        Ok(Self {
            date,
            raw: raw.to_string(),
        })
    }

    /// Release date of this version.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl Eq for ApiVersion {}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.date.cmp(&other.date)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ApiVersion {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// How the create-plan request body is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// `name` and `statement_descriptor` at the top level.
    Flat,
    /// `name` and `statement_descriptor` nested under `product`.
    NestedProduct,
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => f.write_str("flat"),
            Self::NestedProduct => f.write_str("nested_product"),
        }
    }
}

/// Ordered revision boundaries, each starting a payload shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionTable {
    boundaries: Vec<(ApiVersion, PayloadShape)>,
}

impl VersionTable {
    /// Build a table from `(first version, shape)` boundaries in any order.
    #[must_use]
    pub fn new(boundaries: impl IntoIterator<Item = (ApiVersion, PayloadShape)>) -> Self {
        let mut boundaries: Vec<_> = boundaries.into_iter().collect();
        boundaries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { boundaries }
    }

    /// Table with a single boundary: versions from `first` on use products.
    #[must_use]
    pub fn products_since(first: ApiVersion) -> Self {
        Self::new([(first, PayloadShape::NestedProduct)])
    }

    /// Shape for an explicit version.
    ///
    /// The latest boundary at or before `version` wins; versions older than
    /// every boundary are `Flat`.
    #[must_use]
    pub fn shape_for(&self, version: &ApiVersion) -> PayloadShape {
        self.boundaries
            .iter()
            .rev()
            .find(|(boundary, _)| boundary <= version)
            .map(|(_, shape)| *shape)
            .unwrap_or(PayloadShape::Flat)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

/// Maps an optional API version to a payload shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPolicy {
    table: VersionTable,
    unset: PayloadShape,
}

impl VersionPolicy {
    /// Policy over `table`; an unset version resolves to the current shape
    /// (`NestedProduct`).
    #[must_use]
    pub fn new(table: VersionTable) -> Self {
        Self {
            table,
            unset: PayloadShape::NestedProduct,
        }
    }

    /// Override the shape used when no version is known.
    #[must_use]
    pub fn with_unset_shape(mut self, shape: PayloadShape) -> Self {
        self.unset = shape;
        self
    }

    /// Resolve the payload shape for `version`.
    #[must_use]
    pub fn shape(&self, version: Option<&ApiVersion>) -> PayloadShape {
        match version {
            Some(version) => self.table.shape_for(version),
            None => self.unset,
        }
    }

    #[must_use]
    pub fn table(&self) -> &VersionTable {
        &self.table
    }
}
