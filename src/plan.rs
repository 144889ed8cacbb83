//! Plan payload ingestion.
//!
//! Plans round-trip through client storage and backend plan records as
//! JSON. Reading one back is defensive: the payload shape is validated, the
//! day count is floored and clamped to at least one, macro targets are
//! coerced field by field, and rows that no longer parse as plan items are
//! dropped with a warning rather than failing the whole load.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::numeric::{to_number, Scalar};
use crate::types::{MacroTotals, PlanItem};

#[derive(Error, Debug)]
pub enum PlanPayloadError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Payload is not an object")]
    NotAnObject,

    #[error("Payload has no plan array")]
    MissingPlan,
}

/// A stored plan: its entries, the horizon in days, and the macro targets
/// the plan was built against.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanPayload {
    pub days: u32,
    pub target_macros: MacroTotals,
    pub plan: Vec<PlanItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPayload {
    days: Option<Scalar>,
    #[serde(alias = "targetMacros")]
    target_macros: Option<RawMacros>,
    plan: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMacros {
    calories: Option<Scalar>,
    protein: Option<Scalar>,
    fat: Option<Scalar>,
    carbs: Option<Scalar>,
    fiber: Option<Scalar>,
}

/// Parse and sanitize a stored plan payload.
///
/// Errors only on a payload that is not an object or has no `plan` array;
/// everything else is coerced or dropped, matching how lenient the rest of
/// the boundary is about individual fields.
pub fn parse_plan_payload(json: &str) -> Result<PlanPayload, PlanPayloadError> {
    let value: Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(PlanPayloadError::NotAnObject);
    }

    let raw: RawPayload = serde_json::from_value(value)?;
    let rows = raw.plan.ok_or(PlanPayloadError::MissingPlan)?;

    let days = normalize_days(raw.days.as_ref());
    let target_macros = raw
        .target_macros
        .map(normalize_targets)
        .unwrap_or(MacroTotals::ZERO);

    let mut plan = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<PlanItem>(row) {
            Ok(item) => plan.push(item),
            Err(error) => {
                tracing::warn!(row = index + 1, %error, "dropping unreadable plan row");
            }
        }
    }

    Ok(PlanPayload {
        days,
        target_macros,
        plan,
    })
}

fn normalize_days(days: Option<&Scalar>) -> u32 {
    let value = to_number(days);
    if value >= 1.0 {
        value.floor() as u32
    } else {
        1
    }
}

fn normalize_targets(raw: RawMacros) -> MacroTotals {
    MacroTotals {
        calories: to_number(raw.calories.as_ref()),
        protein: to_number(raw.protein.as_ref()),
        fat: to_number(raw.fat.as_ref()),
        carbs: to_number(raw.carbs.as_ref()),
        fiber: to_number(raw.fiber.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::RawId;

    #[test]
    fn test_parses_full_payload() {
        let payload = parse_plan_payload(
            r#"{
                "days": 7,
                "targetMacros": { "calories": "2200", "protein": 150, "fat": 70, "carbs": 220, "fiber": 30 },
                "plan": [
                    { "type": "ingredient", "ingredientId": "1", "unitId": 10, "amount": 200 },
                    { "type": "food", "foodId": "100", "portions": 2, "overrides": {} }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.days, 7);
        assert_eq!(payload.target_macros.calories, 2200.0);
        assert_eq!(payload.target_macros.protein, 150.0);
        assert_eq!(payload.plan.len(), 2);
        match &payload.plan[1] {
            PlanItem::Food { food_id, .. } => {
                assert_eq!(food_id.as_ref(), Some(&RawId::from("100")));
            }
            _ => panic!("expected a food entry"),
        }
    }

    #[test]
    fn test_clamps_days() {
        let zero = parse_plan_payload(r#"{ "days": 0, "plan": [] }"#).unwrap();
        assert_eq!(zero.days, 1);
        let negative = parse_plan_payload(r#"{ "days": -3, "plan": [] }"#).unwrap();
        assert_eq!(negative.days, 1);
        let fractional = parse_plan_payload(r#"{ "days": 2.9, "plan": [] }"#).unwrap();
        assert_eq!(fractional.days, 2);
        let missing = parse_plan_payload(r#"{ "plan": [] }"#).unwrap();
        assert_eq!(missing.days, 1);
    }

    #[test]
    fn test_missing_targets_default_to_zero() {
        let payload = parse_plan_payload(r#"{ "days": 1, "plan": [] }"#).unwrap();
        assert_eq!(payload.target_macros, MacroTotals::ZERO);
    }

    #[test]
    fn test_drops_unreadable_rows() {
        let payload = parse_plan_payload(
            r#"{
                "days": 1,
                "plan": [
                    { "type": "ingredient", "ingredientId": "1", "unitId": 10, "amount": 200 },
                    42,
                    { "no": "type" },
                    { "type": "mystery" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.plan.len(), 1);
    }

    #[test]
    fn test_rejects_malformed_payloads() {
        assert!(matches!(
            parse_plan_payload("not json"),
            Err(PlanPayloadError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_plan_payload("[1, 2, 3]"),
            Err(PlanPayloadError::NotAnObject)
        ));
        assert!(matches!(
            parse_plan_payload(r#"{ "days": 1 }"#),
            Err(PlanPayloadError::MissingPlan)
        ));
    }
}
