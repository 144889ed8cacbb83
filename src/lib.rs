//! Nutrition aggregation and shopping-list consolidation.
//!
//! The computation core of a meal-planning app: unit-conversion resolution
//! with fallback rules, macro scaling across ingredient → food → plan
//! structures, and shopping-list aggregation that merges heterogeneous unit
//! measurements into per-ingredient totals with issue reporting for missing
//! data.
//!
//! Everything is synchronous and referentially transparent: callers pass in
//! the full working set (ingredients, foods, plan rows) and get fresh
//! values back. No I/O happens here and no module-level state exists.

pub mod lookup;
pub mod numeric;
pub mod nutrition;
pub mod plan;
pub mod shopping;
pub mod types;
pub mod units;

pub use lookup::IngredientLookup;
pub use numeric::{normalize_id, to_number, RawId, Scalar};
pub use nutrition::{
    add_macro_totals, grams_for_ingredient_portion, macros_for_food,
    macros_for_ingredient_portion, macros_per_day, scale_macro_totals, sum_macro_totals,
};
pub use plan::{parse_plan_payload, PlanPayload, PlanPayloadError};
pub use shopping::{
    aggregate_shopping_list, IssueKind, ShoppingList, ShoppingListIssue, ShoppingListItem,
    ShoppingListUnitTotal,
};
pub use types::{
    Food, FoodIngredient, FoodOverride, Ingredient, MacroTotals, Nutrition, PlanItem,
    ShoppingUnitRef, Unit,
};
