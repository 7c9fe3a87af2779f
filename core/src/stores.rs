use std::collections::BTreeMap;

use crate::error::DataError;
use crate::models::{Meal, PersonalRecipe, Preferences, validate_recipe_title};

/// Outcome of a vault toggle, so callers can tell the user what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultChange {
    Added,
    Removed,
}

/// The user's saved-recipe collection. Entries are full snapshots taken at
/// favoriting time — later edits to the source meal do not propagate.
/// Invariant: no two entries share an identifier, and the collection stays
/// sorted ascending by display name after every toggle.
#[derive(Debug, Default)]
pub struct VaultStore {
    meals: Vec<Meal>,
}

impl VaultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the entry with `meal.id` if present, otherwise insert a full
    /// snapshot and re-sort. Toggling the same meal twice restores the
    /// prior state exactly.
    pub fn toggle(&mut self, meal: &Meal) -> VaultChange {
        if let Some(pos) = self.meals.iter().position(|m| m.id == meal.id) {
            self.meals.remove(pos);
            VaultChange::Removed
        } else {
            self.meals.push(meal.clone());
            self.meals.sort_by(|a, b| a.name.cmp(&b.name));
            VaultChange::Added
        }
    }

    pub fn clear(&mut self) {
        self.meals.clear();
    }

    /// Restore-only: overwrite the collection verbatim. No re-sort happens
    /// at this layer; callers may re-sort after load if they want to.
    pub fn replace_all(&mut self, meals: Vec<Meal>) {
        self.meals = meals;
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.meals.iter().any(|m| m.id == id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Meal> {
        self.meals.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

/// User-authored recipes, most-recent-first. The caller assigns a unique
/// identifier before insertion.
#[derive(Debug, Default)]
pub struct PersonalRecipeStore {
    recipes: Vec<PersonalRecipe>,
}

impl PersonalRecipeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front. The display name must be non-blank; validation
    /// runs before any mutation.
    pub fn add(&mut self, recipe: PersonalRecipe) -> Result<(), DataError> {
        validate_recipe_title(&recipe.meal.name)?;
        self.recipes.insert(0, recipe);
        Ok(())
    }

    /// Replace the record whose identifier matches. Returns false (and
    /// leaves the collection untouched) when no record matches — a
    /// documented no-op, not an error, so a retried update stays
    /// idempotent. Callers that want to surface the miss can.
    pub fn update(&mut self, recipe: PersonalRecipe) -> Result<bool, DataError> {
        validate_recipe_title(&recipe.meal.name)?;
        match self.recipes.iter().position(|r| r.id() == recipe.id()) {
            Some(pos) => {
                self.recipes[pos] = recipe;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the matching record. Returns false if absent (no-op).
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id() != id);
        self.recipes.len() != before
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
    }

    pub fn replace_all(&mut self, recipes: Vec<PersonalRecipe>) {
        self.recipes = recipes;
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PersonalRecipe> {
        self.recipes.iter().find(|r| r.id() == id)
    }

    #[must_use]
    pub fn recipes(&self) -> &[PersonalRecipe] {
        &self.recipes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Free-text notes keyed by meal identifier. An empty string is a valid
/// note and is distinct from the key being absent.
#[derive(Debug, Default)]
pub struct NotesStore {
    notes: BTreeMap<String, String>,
}

impl NotesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert. Text length is unbounded and "" is kept as a real note.
    pub fn save(&mut self, id: &str, text: &str) {
        self.notes.insert(id.to_string(), text.to_string());
    }

    /// Remove the key entirely. Returns false if there was no note.
    pub fn clear(&mut self, id: &str) -> bool {
        self.notes.remove(id).is_some()
    }

    pub fn clear_all(&mut self) {
        self.notes.clear();
    }

    pub fn replace_all(&mut self, notes: BTreeMap<String, String>) {
        self.notes = notes;
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.notes.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.notes.contains_key(id)
    }

    #[must_use]
    pub fn notes(&self) -> &BTreeMap<String, String> {
        &self.notes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Two independent boolean theme flags.
#[derive(Debug, Default)]
pub struct PreferencesStore {
    prefs: Preferences,
}

impl PreferencesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip dark mode, returning the new value.
    pub fn toggle_dark(&mut self) -> bool {
        self.prefs.dark_mode = !self.prefs.dark_mode;
        self.prefs.dark_mode
    }

    /// Flip the maximum-contrast variant, returning the new value. Valid
    /// regardless of the dark-mode flag.
    pub fn toggle_amoled(&mut self) -> bool {
        self.prefs.amoled_mode = !self.prefs.amoled_mode;
        self.prefs.amoled_mode
    }

    pub fn set(&mut self, prefs: Preferences) {
        self.prefs = prefs;
    }

    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.prefs
    }
}

/// Session-scoped collection of meals fetched from the remote API. Never
/// persisted — it holds nothing that can't be re-fetched.
///
/// The remote API's random-sampling and per-letter search endpoints
/// routinely return overlapping results, so `append` deduplicates by
/// identifier: a newly fetched duplicate never overwrites an existing
/// entry.
#[derive(Debug, Default)]
pub struct MealCache {
    meals: Vec<Meal>,
}

impl MealCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale replace, used after a fresh browse fetch.
    pub fn replace(&mut self, meals: Vec<Meal>) {
        self.meals = meals;
    }

    /// Merge new items, dropping any whose identifier is already cached
    /// (first-seen data wins) — including duplicates within the incoming
    /// batch itself. Returns the number actually added.
    pub fn append(&mut self, meals: Vec<Meal>) -> usize {
        let mut seen: std::collections::HashSet<String> =
            self.meals.iter().map(|m| m.id.clone()).collect();
        let mut added = 0;
        for meal in meals {
            if seen.insert(meal.id.clone()) {
                self.meals.push(meal);
                added += 1;
            }
        }
        added
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Meal> {
        self.meals.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Meal> {
        self.meals
            .iter()
            .filter(|m| m.category.as_deref() == Some(category))
            .collect()
    }

    #[must_use]
    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn clear(&mut self) {
        self.meals.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}
