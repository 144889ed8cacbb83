//! Domain records as supplied by the API and stored plan payloads.
//!
//! These are explicit DTOs rather than generated schema types: the wire
//! format is an external, versioned contract, and these structs tolerate the
//! loose typing it allows (numbers as strings, absent fields, ids that are
//! numbers in one place and strings in another).
//!
//! Backend records use snake_case field names; plan items round-trip
//! through client storage and use camelCase, matching the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::numeric::{RawId, Scalar};

/// Per-gram nutrient record. Absent or malformed fields are treated as zero
/// at computation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrition {
    pub calories: Option<Scalar>,
    pub protein: Option<Scalar>,
    pub fat: Option<Scalar>,
    pub carbohydrates: Option<Scalar>,
    pub fiber: Option<Scalar>,
}

/// A named measure scoped to one ingredient.
///
/// A unit with no id is the ingredient's default-gram sentinel; `grams` is
/// the mass one unit represents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Unit {
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub grams: Option<Scalar>,
}

/// Nested preferred-unit form some API versions emit instead of a flat id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingUnitRef {
    pub id: Option<RawId>,
}

/// A named substance with per-gram nutrition and its measurement units.
///
/// `id` may be absent for ephemeral draft records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingredient {
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub nutrition: Option<Nutrition>,
    pub units: Vec<Unit>,
    /// Preferred unit for shopping-list display.
    #[serde(alias = "shoppingUnitId")]
    pub shopping_unit_id: Option<RawId>,
    pub shopping_unit: Option<ShoppingUnitRef>,
}

impl Ingredient {
    /// Preferred shopping unit id, whichever wire form supplied it.
    pub fn preferred_unit_id(&self) -> Option<&RawId> {
        self.shopping_unit_id
            .as_ref()
            .or_else(|| self.shopping_unit.as_ref().and_then(|unit| unit.id.as_ref()))
    }
}

/// One line of a food: an ingredient, a unit, and the amount of that unit
/// per single portion of the food.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodIngredient {
    pub ingredient_id: Option<RawId>,
    pub unit_id: Option<RawId>,
    pub unit_quantity: Option<Scalar>,
}

/// A named composite of ingredient lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Food {
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub ingredients: Vec<FoodIngredient>,
}

/// A per-ingredient override on a food plan entry, replacing the food's
/// stored per-portion unit and quantity for that ingredient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FoodOverride {
    pub unit_id: Option<RawId>,
    pub quantity: Option<Scalar>,
}

/// One entry of a meal plan: a food at some portion count, or a standalone
/// ingredient amount. Overrides are keyed by stringified ingredient id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlanItem {
    #[serde(rename_all = "camelCase")]
    Food {
        #[serde(default)]
        food_id: Option<RawId>,
        #[serde(default)]
        portions: Option<Scalar>,
        #[serde(default)]
        overrides: BTreeMap<String, FoodOverride>,
    },
    #[serde(rename_all = "camelCase")]
    Ingredient {
        #[serde(default)]
        ingredient_id: Option<RawId>,
        #[serde(default)]
        unit_id: Option<RawId>,
        #[serde(default)]
        amount: Option<Scalar>,
        #[serde(default)]
        portions: Option<Scalar>,
    },
}

/// The five tracked nutrients. Zero is the identity under summation; the
/// core never clamps, so negative upstream values pass through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub fiber: f64,
}

impl MacroTotals {
    pub const ZERO: MacroTotals = MacroTotals {
        calories: 0.0,
        protein: 0.0,
        fat: 0.0,
        carbs: 0.0,
        fiber: 0.0,
    };
}
