//! Ingredient indexing.
//!
//! Identifiers arrive as JSON numbers from the API and as strings from form
//! state or UUID columns, so the index canonicalizes every id to a single
//! string key at build time. Retrieval works regardless of which
//! representation the caller holds.

use std::collections::HashMap;

use crate::numeric::{normalize_id, RawId};
use crate::types::Ingredient;

/// An index over an ingredient collection, keyed by canonical id.
pub struct IngredientLookup<'a> {
    by_id: HashMap<String, &'a Ingredient>,
}

impl<'a> IngredientLookup<'a> {
    /// Index ingredients by canonical id. Ingredients without an id
    /// (ephemeral drafts) are skipped; a repeated id keeps the later record.
    pub fn new(ingredients: &'a [Ingredient]) -> Self {
        let mut by_id = HashMap::with_capacity(ingredients.len());
        for ingredient in ingredients {
            if let Some(key) = normalize_id(ingredient.id.as_ref()) {
                by_id.insert(key, ingredient);
            }
        }
        IngredientLookup { by_id }
    }

    /// Find an ingredient regardless of the id's source representation.
    ///
    /// Blank or unresolvable ids yield `None`, never a panic.
    pub fn find(&self, id: Option<&RawId>) -> Option<&'a Ingredient> {
        let key = normalize_id(id)?;
        if let Some(found) = self.by_id.get(&key).copied() {
            return Some(found);
        }

        // A numeric id in a non-canonical spelling ("42.0", " 7") still has
        // to find the ingredient stored under the number.
        let reparsed = key.trim().parse::<f64>().ok()?;
        if !reparsed.is_finite() {
            return None;
        }
        self.by_id.get(&format!("{reparsed}")).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
