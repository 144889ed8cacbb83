//! Unit resolution.
//!
//! Two deliberately different policies share one id-matching primitive.
//! Macro computation resolves leniently: an unknown or omitted unit id
//! degrades to the gram unit so live-editing views keep rendering. Shopping
//! aggregation resolves strictly: past the null-sentinel default unit it
//! returns nothing, and the caller reports an issue instead of guessing.

use crate::numeric::{normalize_id, to_number, RawId};
use crate::types::Unit;

/// Requested-id sentinel some clients send for the null-id default unit.
const NULL_UNIT_SENTINEL: &str = "0";

/// Grams-per-unit of the canonical "per gram" unit.
const ONE_GRAM: f64 = 1.0;

/// A unit with its gram conversion coerced to a plain number.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedUnit {
    pub id: Option<RawId>,
    pub name: String,
    pub grams: f64,
}

fn resolved(unit: &Unit) -> ResolvedUnit {
    ResolvedUnit {
        id: unit.id.clone(),
        name: unit.name.clone().unwrap_or_default(),
        grams: to_number(unit.grams.as_ref()),
    }
}

/// Find a unit whose canonical id equals `target` (`None` matches the
/// ingredient-scoped default-gram sentinel unit).
fn find_by_id<'a>(units: &'a [Unit], target: Option<&str>) -> Option<&'a Unit> {
    units
        .iter()
        .find(|unit| normalize_id(unit.id.as_ref()).as_deref() == target)
}

/// Lenient resolution used by the macro calculator.
///
/// In order: match by canonical id (or the null-sentinel unit when the id
/// is omitted), then the first unit with `grams == 1`, then the first unit.
/// `None` only when `units` is empty, so resolution always succeeds when
/// any units exist.
pub fn resolve_unit(units: &[Unit], requested: Option<&RawId>) -> Option<ResolvedUnit> {
    if units.is_empty() {
        return None;
    }

    match normalize_id(requested) {
        Some(target) => {
            if let Some(unit) = find_by_id(units, Some(&target)) {
                return Some(resolved(unit));
            }
        }
        None => {
            if let Some(unit) = find_by_id(units, None) {
                return Some(resolved(unit));
            }
        }
    }

    if let Some(unit) = units
        .iter()
        .find(|unit| to_number(unit.grams.as_ref()) == ONE_GRAM)
    {
        return Some(resolved(unit));
    }

    units.first().map(resolved)
}

/// Strict resolution used by the shopping aggregator.
///
/// Matches by canonical id; a requested id of exactly `"0"` and an omitted
/// id both fall back to the null-sentinel unit. Anything unresolved past
/// that is the caller's issue to report, not a value to invent.
pub fn resolve_shopping_unit(units: &[Unit], requested: Option<&RawId>) -> Option<ResolvedUnit> {
    if units.is_empty() {
        return None;
    }

    match normalize_id(requested) {
        Some(target) => {
            if let Some(unit) = find_by_id(units, Some(&target)) {
                return Some(resolved(unit));
            }
            if target == NULL_UNIT_SENTINEL {
                return find_by_id(units, None).map(resolved);
            }
            None
        }
        None => find_by_id(units, None).map(resolved),
    }
}
