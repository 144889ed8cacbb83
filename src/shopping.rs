//! Shopping-list aggregation.
//!
//! Consolidates a plan into per-ingredient gram totals plus per-unit
//! quantities, so a row can read "200 g + 1.5 cups" while the combined
//! weight stays known. Unlike the macro calculator, unresolvable lines
//! surface as structured issues: the shopping list is a checklist the user
//! acts on, and a silent zero would hide a real data problem. The function
//! is total — bad input produces issues, never a panic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lookup::IngredientLookup;
use crate::numeric::{normalize_id, to_number, RawId, Scalar};
use crate::types::{Food, FoodOverride, Ingredient, PlanItem};
use crate::units::{resolve_shopping_unit, ResolvedUnit};

/// Map key for contributions measured in the null-sentinel default unit.
const NULL_UNIT_KEY: &str = "__null__";

/// What kind of data was missing for a skipped plan line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    MissingFood,
    MissingIngredient,
    MissingUnit,
    MissingQuantity,
    MissingGrams,
}

/// A data-quality problem that prevented a plan line from contributing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListIssue {
    pub kind: IssueKind,
    pub message: String,
}

/// One unit's share of an ingredient's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListUnitTotal {
    pub unit_id: Option<RawId>,
    pub unit_name: String,
    pub quantity: f64,
    pub grams_per_unit: f64,
}

/// Consolidated totals for one distinct ingredient across the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub ingredient_id: Option<RawId>,
    pub name: String,
    pub total_grams: f64,
    /// All units the plan used for this ingredient, positive quantities
    /// only, sorted by grams-per-unit ascending then unit name.
    pub unit_totals: Vec<ShoppingListUnitTotal>,
    /// The total re-expressed in the ingredient's preferred shopping unit,
    /// when one is configured and resolves to a positive quantity.
    pub preferred_unit_total: Option<ShoppingListUnitTotal>,
}

/// The consolidated list plus everything that could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub items: Vec<ShoppingListItem>,
    pub issues: Vec<ShoppingListIssue>,
}

struct Accumulator<'a> {
    ingredient: &'a Ingredient,
    total_grams: f64,
    unit_totals: BTreeMap<String, ShoppingListUnitTotal>,
}

fn display_id(id: Option<&RawId>) -> String {
    normalize_id(id).unwrap_or_default()
}

fn ingredient_name(ingredient: &Ingredient) -> &str {
    ingredient.name.as_deref().unwrap_or("")
}

fn issue(kind: IssueKind, message: String) -> ShoppingListIssue {
    ShoppingListIssue { kind, message }
}

/// Consolidate a plan against its food and ingredient collections.
///
/// Pure and deterministic: structurally equal inputs produce structurally
/// equal outputs. Every malformed or unresolvable line becomes an issue and
/// contributes zero grams.
pub fn aggregate_shopping_list(
    plan: &[PlanItem],
    foods: &[Food],
    ingredients: &[Ingredient],
) -> ShoppingList {
    let lookup = IngredientLookup::new(ingredients);
    let mut totals: BTreeMap<String, Accumulator<'_>> = BTreeMap::new();
    let mut issues: Vec<ShoppingListIssue> = Vec::new();

    for (index, item) in plan.iter().enumerate() {
        let row = index + 1;
        match item {
            PlanItem::Ingredient {
                ingredient_id,
                unit_id,
                amount,
                portions,
            } => aggregate_ingredient_row(
                &lookup,
                &mut totals,
                &mut issues,
                row,
                ingredient_id.as_ref(),
                unit_id.as_ref(),
                amount.as_ref(),
                portions.as_ref(),
            ),
            PlanItem::Food {
                food_id,
                portions,
                overrides,
            } => aggregate_food_row(
                &lookup,
                foods,
                &mut totals,
                &mut issues,
                food_id.as_ref(),
                portions.as_ref(),
                overrides,
            ),
        }
    }

    let mut items: Vec<ShoppingListItem> = totals.into_values().map(shape_item).collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!(
        items = items.len(),
        issues = issues.len(),
        "aggregated shopping list"
    );

    ShoppingList { items, issues }
}

#[allow(clippy::too_many_arguments)]
fn aggregate_ingredient_row<'a>(
    lookup: &IngredientLookup<'a>,
    totals: &mut BTreeMap<String, Accumulator<'a>>,
    issues: &mut Vec<ShoppingListIssue>,
    row: usize,
    ingredient_id: Option<&RawId>,
    unit_id: Option<&RawId>,
    amount: Option<&Scalar>,
    portions: Option<&Scalar>,
) {
    let Some(ingredient) = lookup.find(ingredient_id) else {
        issues.push(issue(
            IssueKind::MissingIngredient,
            format!(
                "Ingredient {} could not be found for plan row {}.",
                display_id(ingredient_id),
                row
            ),
        ));
        return;
    };
    let name = ingredient_name(ingredient);

    let Some(unit) = resolve_shopping_unit(&ingredient.units, unit_id) else {
        issues.push(issue(
            IssueKind::MissingUnit,
            format!(
                "Ingredient \"{}\" is missing unit {} required by the plan.",
                name,
                display_id(unit_id)
            ),
        ));
        return;
    };

    if unit.grams <= 0.0 {
        issues.push(issue(
            IssueKind::MissingGrams,
            format!(
                "Ingredient \"{}\" unit \"{}\" has no gram conversion.",
                name, unit.name
            ),
        ));
        return;
    }

    let amount = to_number(amount);
    if amount <= 0.0 {
        issues.push(issue(
            IssueKind::MissingQuantity,
            format!("Ingredient \"{}\" has no valid quantity in the plan.", name),
        ));
        return;
    }

    // Portions default to 1 for standalone ingredient rows.
    let portions = match portions {
        Some(value) => to_number(Some(value)),
        None => 1.0,
    };
    if portions <= 0.0 {
        issues.push(issue(
            IssueKind::MissingQuantity,
            format!(
                "Ingredient \"{}\" has no valid portion count in the plan.",
                name
            ),
        ));
        return;
    }

    add_contribution(totals, ingredient, &unit, amount * portions);
}

fn aggregate_food_row<'a>(
    lookup: &IngredientLookup<'a>,
    foods: &[Food],
    totals: &mut BTreeMap<String, Accumulator<'a>>,
    issues: &mut Vec<ShoppingListIssue>,
    food_id: Option<&RawId>,
    portions: Option<&Scalar>,
    overrides: &BTreeMap<String, FoodOverride>,
) {
    let target = normalize_id(food_id);
    let Some(food) = foods
        .iter()
        .find(|candidate| normalize_id(candidate.id.as_ref()) == target)
    else {
        issues.push(issue(
            IssueKind::MissingFood,
            format!(
                "Food {} referenced by the plan is unavailable.",
                display_id(food_id)
            ),
        ));
        return;
    };
    let food_name = food.name.as_deref().unwrap_or("");

    let portions = to_number(portions);
    if portions <= 0.0 {
        issues.push(issue(
            IssueKind::MissingQuantity,
            format!(
                "Food \"{}\" has no valid portion quantity in the plan.",
                food_name
            ),
        ));
        return;
    }

    if food.ingredients.is_empty() {
        issues.push(issue(
            IssueKind::MissingIngredient,
            format!(
                "Food \"{}\" has no ingredient details and was skipped.",
                food_name
            ),
        ));
        return;
    }

    for line in &food.ingredients {
        let Some(ingredient) = lookup.find(line.ingredient_id.as_ref()) else {
            issues.push(issue(
                IssueKind::MissingIngredient,
                format!(
                    "Ingredient {} from food \"{}\" is unavailable.",
                    display_id(line.ingredient_id.as_ref()),
                    food_name
                ),
            ));
            continue;
        };
        let name = ingredient_name(ingredient);

        let override_entry = normalize_id(line.ingredient_id.as_ref())
            .and_then(|key| overrides.get(&key));
        let unit_id = override_entry
            .and_then(|entry| entry.unit_id.as_ref())
            .or(line.unit_id.as_ref());

        let Some(unit) = resolve_shopping_unit(&ingredient.units, unit_id) else {
            issues.push(issue(
                IssueKind::MissingUnit,
                format!(
                    "Ingredient \"{}\" in food \"{}\" is missing unit {}.",
                    name,
                    food_name,
                    display_id(unit_id)
                ),
            ));
            continue;
        };

        if unit.grams <= 0.0 {
            issues.push(issue(
                IssueKind::MissingGrams,
                format!(
                    "Ingredient \"{}\" unit \"{}\" in food \"{}\" has no gram conversion.",
                    name, unit.name, food_name
                ),
            ));
            continue;
        }

        let per_portion = to_number(
            override_entry
                .and_then(|entry| entry.quantity.as_ref())
                .or(line.unit_quantity.as_ref()),
        );
        if per_portion <= 0.0 {
            issues.push(issue(
                IssueKind::MissingQuantity,
                format!(
                    "Ingredient \"{}\" in food \"{}\" has no valid quantity.",
                    name, food_name
                ),
            ));
            continue;
        }

        let total_quantity = per_portion * portions;
        if !total_quantity.is_finite() || total_quantity <= 0.0 {
            issues.push(issue(
                IssueKind::MissingQuantity,
                format!(
                    "Ingredient \"{}\" in food \"{}\" results in zero quantity after scaling portions.",
                    name, food_name
                ),
            ));
            continue;
        }

        add_contribution(totals, ingredient, &unit, total_quantity);
    }
}

/// Fold one resolved line into the per-ingredient accumulator.
///
/// Keyed by canonical ingredient id, falling back to the name for draft
/// records. Contributions in the same unit sum their quantities; the
/// running gram total mixes units freely.
fn add_contribution<'a>(
    totals: &mut BTreeMap<String, Accumulator<'a>>,
    ingredient: &'a Ingredient,
    unit: &ResolvedUnit,
    quantity: f64,
) {
    if !quantity.is_finite() || quantity <= 0.0 {
        return;
    }
    let grams_per_unit = unit.grams;
    if !grams_per_unit.is_finite() || grams_per_unit <= 0.0 {
        return;
    }
    let grams = grams_per_unit * quantity;
    if !grams.is_finite() || grams <= 0.0 {
        return;
    }

    let key = normalize_id(ingredient.id.as_ref())
        .or_else(|| ingredient.name.clone().filter(|name| !name.is_empty()));
    let Some(key) = key else {
        return;
    };

    let entry = totals.entry(key).or_insert_with(|| Accumulator {
        ingredient,
        total_grams: 0.0,
        unit_totals: BTreeMap::new(),
    });
    entry.total_grams += grams;

    let unit_key = normalize_id(unit.id.as_ref()).unwrap_or_else(|| NULL_UNIT_KEY.to_string());
    entry
        .unit_totals
        .entry(unit_key)
        .and_modify(|total| total.quantity += quantity)
        .or_insert_with(|| ShoppingListUnitTotal {
            unit_id: unit.id.clone(),
            unit_name: unit.name.clone(),
            quantity,
            grams_per_unit,
        });
}

fn shape_item(entry: Accumulator<'_>) -> ShoppingListItem {
    let preferred_unit_total = preferred_unit_total(entry.ingredient, entry.total_grams);

    let mut unit_totals: Vec<ShoppingListUnitTotal> = entry
        .unit_totals
        .into_values()
        .filter(|total| total.quantity > 0.0 && total.grams_per_unit > 0.0)
        .collect();
    unit_totals.sort_by(|a, b| {
        a.grams_per_unit
            .total_cmp(&b.grams_per_unit)
            .then_with(|| a.unit_name.cmp(&b.unit_name))
    });

    ShoppingListItem {
        ingredient_id: entry.ingredient.id.clone(),
        name: entry
            .ingredient
            .name
            .clone()
            .unwrap_or_else(|| "Unnamed ingredient".to_string()),
        total_grams: entry.total_grams,
        unit_totals,
        preferred_unit_total,
    }
}

/// Re-express a gram total in the ingredient's preferred shopping unit.
/// `None` when no preferred unit is configured, it does not resolve, or the
/// quantity would not be positive and finite.
fn preferred_unit_total(ingredient: &Ingredient, total_grams: f64) -> Option<ShoppingListUnitTotal> {
    let preferred_id = ingredient.preferred_unit_id()?;
    let unit = resolve_shopping_unit(&ingredient.units, Some(preferred_id))?;
    if unit.grams <= 0.0 {
        return None;
    }
    let quantity = total_grams / unit.grams;
    if !quantity.is_finite() || quantity <= 0.0 {
        return None;
    }
    Some(ShoppingListUnitTotal {
        unit_id: unit.id.clone().or_else(|| Some(preferred_id.clone())),
        unit_name: unit.name.clone(),
        quantity,
        grams_per_unit: unit.grams,
    })
}
