//! Create-plan request bodies.

use serde::Serialize;

use super::version::PayloadShape;
use crate::plans::{Interval, Metadata, PlanDefinition};

/// Request body for creating a plan remotely.
///
/// Absent optional fields are sent as explicit `null`s. In the nested shape
/// `statement_descriptor` only appears under `product`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreatePlanPayload {
    Flat(FlatPlanPayload),
    NestedProduct(ProductPlanPayload),
}

/// Body for API versions without products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatPlanPayload {
    pub id: String,
    pub currency: String,
    pub name: String,
    pub amount: u64,
    pub interval: Interval,
    pub interval_count: u32,
    pub trial_period_days: u32,
    pub metadata: Option<Metadata>,
    pub statement_descriptor: Option<String>,
}

/// Body for API versions with products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPlanPayload {
    pub id: String,
    pub currency: String,
    pub product: ProductPayload,
    pub amount: u64,
    pub interval: Interval,
    pub interval_count: u32,
    pub trial_period_days: u32,
    pub metadata: Option<Metadata>,
}

/// Inline product created alongside the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    pub name: String,
    pub statement_descriptor: Option<String>,
}

impl CreatePlanPayload {
    /// Shape a definition's fields for the given payload shape.
    #[must_use]
    pub fn from_definition(definition: &PlanDefinition, shape: PayloadShape) -> Self {
        let id = definition.identifier().to_string();
        let currency = definition.currency().to_string();
        let name = definition.name().to_string();
        let statement_descriptor = definition.statement_descriptor().map(String::from);
        let metadata = definition.metadata().cloned();

        match shape {
            PayloadShape::Flat => Self::Flat(FlatPlanPayload {
                id,
                currency,
                name,
                amount: definition.amount(),
                interval: definition.interval(),
                interval_count: definition.interval_count(),
                trial_period_days: definition.trial_period_days(),
                metadata,
                statement_descriptor,
            }),
            PayloadShape::NestedProduct => Self::NestedProduct(ProductPlanPayload {
                id,
                currency,
                product: ProductPayload {
                    name,
                    statement_descriptor,
                },
                amount: definition.amount(),
                interval: definition.interval(),
                interval_count: definition.interval_count(),
                trial_period_days: definition.trial_period_days(),
                metadata,
            }),
        }
    }

    /// Plan ID this payload creates.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Flat(p) => &p.id,
            Self::NestedProduct(p) => &p.id,
        }
    }

    #[must_use]
    pub fn shape(&self) -> PayloadShape {
        match self {
            Self::Flat(_) => PayloadShape::Flat,
            Self::NestedProduct(_) => PayloadShape::NestedProduct,
        }
    }

    /// Render the request body as JSON.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        // Only string keys and plain scalars, so serialization cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
