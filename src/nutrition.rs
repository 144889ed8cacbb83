//! Macro computation.
//!
//! Everything here is lenient by choice: these totals feed live-editing
//! views, so a missing lookup, an unknown unit, or a malformed numeric
//! field contributes zero instead of failing the whole computation. The
//! shopping aggregator applies the strict counterpart of these rules and
//! reports issues instead.

use std::collections::BTreeMap;

use crate::lookup::IngredientLookup;
use crate::numeric::{normalize_id, to_number, RawId, Scalar};
use crate::types::{Food, FoodOverride, Ingredient, MacroTotals, Nutrition};
use crate::units::resolve_unit;

/// Nutrition with every field coerced to a per-gram number.
fn normalize_nutrition(nutrition: Option<&Nutrition>) -> MacroTotals {
    let Some(nutrition) = nutrition else {
        return MacroTotals::ZERO;
    };
    MacroTotals {
        calories: to_number(nutrition.calories.as_ref()),
        protein: to_number(nutrition.protein.as_ref()),
        fat: to_number(nutrition.fat.as_ref()),
        carbs: to_number(nutrition.carbohydrates.as_ref()),
        fiber: to_number(nutrition.fiber.as_ref()),
    }
}

/// Macro totals for `quantity` of an ingredient measured in `unit_id`.
///
/// Unit resolution is lenient; an absent quantity counts as zero, not as
/// "use a default". Malformed nutrition or gram fields coerce to zero
/// before multiplication, so bad data yields a zero contribution rather
/// than NaN spreading into every downstream total.
pub fn macros_for_ingredient_portion(
    ingredient: Option<&Ingredient>,
    unit_id: Option<&RawId>,
    quantity: Option<&Scalar>,
) -> MacroTotals {
    let Some(ingredient) = ingredient else {
        return MacroTotals::ZERO;
    };

    let grams_per_unit = resolve_unit(&ingredient.units, unit_id).map_or(0.0, |unit| unit.grams);
    let per_gram = normalize_nutrition(ingredient.nutrition.as_ref());
    let factor = grams_per_unit * to_number(quantity);

    MacroTotals {
        calories: per_gram.calories * factor,
        protein: per_gram.protein * factor,
        fat: per_gram.fat * factor,
        carbs: per_gram.carbs * factor,
        fiber: per_gram.fiber * factor,
    }
}

/// Gram weight of `quantity` of an ingredient measured in `unit_id`, with
/// the same lenient resolution as the macro path.
pub fn grams_for_ingredient_portion(
    ingredient: Option<&Ingredient>,
    unit_id: Option<&RawId>,
    quantity: Option<&Scalar>,
) -> f64 {
    let Some(ingredient) = ingredient else {
        return 0.0;
    };
    let grams_per_unit = resolve_unit(&ingredient.units, unit_id).map_or(0.0, |unit| unit.grams);
    grams_per_unit * to_number(quantity)
}

/// Macro totals for one portion of a food, summed across its ingredient
/// lines.
///
/// Lines whose ingredient is not in the lookup are skipped silently. An
/// override keyed by the line's stringified ingredient id takes precedence
/// over the stored unit and quantity, field by field.
pub fn macros_for_food(
    food: Option<&Food>,
    lookup: &IngredientLookup<'_>,
    overrides: Option<&BTreeMap<String, FoodOverride>>,
) -> MacroTotals {
    let Some(food) = food else {
        return MacroTotals::ZERO;
    };

    food.ingredients.iter().fold(MacroTotals::ZERO, |totals, line| {
        let Some(ingredient) = lookup.find(line.ingredient_id.as_ref()) else {
            return totals;
        };

        let override_entry = normalize_id(line.ingredient_id.as_ref())
            .and_then(|key| overrides.and_then(|map| map.get(&key)));
        let unit_id = override_entry
            .and_then(|entry| entry.unit_id.as_ref())
            .or(line.unit_id.as_ref());
        let quantity = override_entry
            .and_then(|entry| entry.quantity.as_ref())
            .or(line.unit_quantity.as_ref());

        add_macro_totals(
            totals,
            macros_for_ingredient_portion(Some(ingredient), unit_id, quantity),
        )
    })
}

pub fn add_macro_totals(a: MacroTotals, b: MacroTotals) -> MacroTotals {
    MacroTotals {
        calories: a.calories + b.calories,
        protein: a.protein + b.protein,
        fat: a.fat + b.fat,
        carbs: a.carbs + b.carbs,
        fiber: a.fiber + b.fiber,
    }
}

/// Fold with the all-zero identity.
pub fn sum_macro_totals<I>(totals: I) -> MacroTotals
where
    I: IntoIterator<Item = MacroTotals>,
{
    totals.into_iter().fold(MacroTotals::ZERO, add_macro_totals)
}

/// Scale every field by `multiplier`.
///
/// An invalid multiplier (non-finite, zero, negative) means no
/// contribution, so the result is the all-zero totals rather than the
/// original.
pub fn scale_macro_totals(totals: MacroTotals, multiplier: f64) -> MacroTotals {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return MacroTotals::ZERO;
    }
    MacroTotals {
        calories: totals.calories * multiplier,
        protein: totals.protein * multiplier,
        fat: totals.fat * multiplier,
        carbs: totals.carbs * multiplier,
        fiber: totals.fiber * multiplier,
    }
}

/// Per-day share of a plan total. The divisor is user input; anything
/// non-finite or non-positive yields zero totals instead of letting
/// Infinity or NaN reach a rendered value.
pub fn macros_per_day(totals: MacroTotals, days: f64) -> MacroTotals {
    if !days.is_finite() || days <= 0.0 {
        return MacroTotals::ZERO;
    }
    MacroTotals {
        calories: totals.calories / days,
        protein: totals.protein / days,
        fat: totals.fat / days,
        carbs: totals.carbs / days,
        fiber: totals.fiber / days,
    }
}
