use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::backup::{self, BackupOutcome, BackupSelection, ImageMode, RestoreReport};
use crate::db::Database;
use crate::error::DataError;
use crate::images::{self, ImageRef};
use crate::models::{Category, Meal, NewPersonalRecipe, PersonalRecipe, Preferences};
use crate::stores::{
    MealCache, NotesStore, PersonalRecipeStore, PreferencesStore, VaultChange, VaultStore,
};

const VAULT_KEY: &str = "vault";
const PERSONAL_KEY: &str = "personalrecipes";
const NOTES_KEY: &str = "notes";
const PREFS_KEY: &str = "preferences";

/// First-letter pages fetched for a browse feed, matching the original
/// app's home screen.
pub const BROWSE_LETTERS: &[char] = &['a', 'b', 'c', 'd'];

/// How a search query is interpreted against the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Name,
    Ingredient,
    Category,
    Area,
    FirstLetter,
}

/// Platform-native remote meal lookup.
///
/// The CLI implements this with reqwest; a mobile shell would bring its
/// own HTTP stack. Called synchronously — async callers bridge with a
/// runtime handle.
pub trait MealProvider: Send + Sync {
    fn search(&self, query: &str, kind: SearchKind) -> Result<Vec<Meal>, DataError>;
    fn lookup(&self, id: &str) -> Result<Option<Meal>, DataError>;
    fn random(&self) -> Result<Option<Meal>, DataError>;
    fn categories(&self) -> Result<Vec<Category>, DataError>;
}

/// Application root owning the persistence substrate and every store.
/// All mutating operations write the affected store's document through to
/// the substrate immediately, so readers never observe a stale view.
pub struct TastyService {
    db: Database,
    images_dir: PathBuf,
    vault: VaultStore,
    personal: PersonalRecipeStore,
    notes: NotesStore,
    prefs: PreferencesStore,
    cache: MealCache,
}

impl TastyService {
    pub fn new(db_path: &Path, images_dir: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Self::with_database(db, images_dir)
    }

    pub fn new_in_memory(images_dir: &Path) -> Result<Self> {
        let db = Database::open_in_memory()?;
        Self::with_database(db, images_dir)
    }

    fn with_database(db: Database, images_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(images_dir).with_context(|| {
            format!("Failed to create images directory: {}", images_dir.display())
        })?;

        let mut vault = VaultStore::new();
        vault.replace_all(load_document(&db, VAULT_KEY)?);
        let mut personal = PersonalRecipeStore::new();
        personal.replace_all(load_document(&db, PERSONAL_KEY)?);
        let mut notes = NotesStore::new();
        notes.replace_all(load_document(&db, NOTES_KEY)?);
        let mut prefs = PreferencesStore::new();
        prefs.set(load_document(&db, PREFS_KEY)?);

        Ok(Self {
            db,
            images_dir: images_dir.to_path_buf(),
            vault,
            personal,
            notes,
            prefs,
            cache: MealCache::new(),
        })
    }

    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    // --- Vault ---

    pub fn toggle_vault(&mut self, meal: &Meal) -> Result<VaultChange> {
        let change = self.vault.toggle(meal);
        self.persist_vault()?;
        Ok(change)
    }

    pub fn clear_vault(&mut self) -> Result<()> {
        self.vault.clear();
        self.persist_vault()
    }

    #[must_use]
    pub fn vault(&self) -> &[Meal] {
        self.vault.meals()
    }

    #[must_use]
    pub fn vault_contains(&self, id: &str) -> bool {
        self.vault.contains(id)
    }

    // --- Personal recipes ---

    /// Author a new recipe: validates the title, assigns a monotonic
    /// millisecond-timestamp identifier, stamps the creation time, and
    /// inserts at the front of the collection.
    pub fn add_personal_recipe(&mut self, new: NewPersonalRecipe) -> Result<PersonalRecipe> {
        let recipe = PersonalRecipe {
            meal: Meal {
                id: self.next_recipe_id(),
                name: new.name,
                category: new.category,
                area: new.area,
                instructions: new.instructions,
                thumbnail: new.thumbnail,
                youtube: new.youtube,
                ingredients: new.ingredients,
            },
            author_owned: true,
            created_at: Local::now().to_rfc3339(),
        };
        self.personal.add(recipe.clone())?;
        self.persist_personal()?;
        Ok(recipe)
    }

    /// Replace the record matching `recipe.id()`. Returns whether a match
    /// was found; a miss leaves everything untouched.
    pub fn update_personal_recipe(&mut self, recipe: PersonalRecipe) -> Result<bool> {
        let matched = self.personal.update(recipe)?;
        if matched {
            self.persist_personal()?;
        }
        Ok(matched)
    }

    /// Delete one recipe, removing its locally-stored image files first
    /// (best-effort) so they don't pile up as orphans. Returns whether a
    /// match was found.
    pub fn delete_personal_recipe(&mut self, id: &str) -> Result<bool> {
        if let Some(recipe) = self.personal.get(id) {
            remove_local_images(&recipe.meal);
        }
        let matched = self.personal.delete(id);
        if matched {
            self.persist_personal()?;
        }
        Ok(matched)
    }

    /// Clear the whole store. Every locally-referenced image file of the
    /// recipes about to be deleted is removed from disk first.
    pub fn clear_personal_recipes(&mut self) -> Result<()> {
        for recipe in self.personal.recipes() {
            remove_local_images(&recipe.meal);
        }
        self.personal.clear();
        self.persist_personal()
    }

    #[must_use]
    pub fn personal_recipes(&self) -> &[PersonalRecipe] {
        self.personal.recipes()
    }

    #[must_use]
    pub fn personal_recipe(&self, id: &str) -> Option<&PersonalRecipe> {
        self.personal.get(id)
    }

    /// Copy a user-supplied image into the managed images directory and
    /// return the stored reference, the way the original app copied picked
    /// photos into its document directory.
    pub fn import_local_image(&self, source: &Path) -> Result<String> {
        let filename = source
            .file_name()
            .and_then(|n| n.to_str())
            .context("Image path has no filename")?;
        let mut dest = self.images_dir.join(filename);
        if dest.exists() {
            dest = self.images_dir.join(format!("{}-{filename}", Uuid::new_v4()));
        }
        std::fs::copy(source, &dest)
            .with_context(|| format!("Failed to copy image: {}", source.display()))?;
        Ok(dest.to_string_lossy().into_owned())
    }

    fn next_recipe_id(&self) -> String {
        let mut id = Local::now().timestamp_millis();
        while self.personal.get(&id.to_string()).is_some() {
            id += 1;
        }
        id.to_string()
    }

    // --- Notes ---

    pub fn save_note(&mut self, id: &str, text: &str) -> Result<()> {
        self.notes.save(id, text);
        self.persist_notes()
    }

    pub fn clear_note(&mut self, id: &str) -> Result<bool> {
        let removed = self.notes.clear(id);
        if removed {
            self.persist_notes()?;
        }
        Ok(removed)
    }

    pub fn clear_all_notes(&mut self) -> Result<()> {
        self.notes.clear_all();
        self.persist_notes()
    }

    #[must_use]
    pub fn note(&self, id: &str) -> Option<&str> {
        self.notes.get(id)
    }

    #[must_use]
    pub fn notes(&self) -> &BTreeMap<String, String> {
        self.notes.notes()
    }

    // --- Preferences ---

    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        let on = self.prefs.toggle_dark();
        self.persist_prefs()?;
        Ok(on)
    }

    pub fn toggle_amoled_mode(&mut self) -> Result<bool> {
        let on = self.prefs.toggle_amoled();
        self.persist_prefs()?;
        Ok(on)
    }

    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.prefs.preferences()
    }

    // --- Remote meal cache ---

    #[must_use]
    pub fn cache(&self) -> &MealCache {
        &self.cache
    }

    /// Wholesale-replace the session cache after a fresh browse fetch.
    pub fn replace_cache(&mut self, meals: Vec<Meal>) {
        self.cache.replace(meals);
    }

    /// Fold freshly fetched meals into the session cache, dropping any
    /// identifier already present. Returns how many were added.
    pub fn append_cache(&mut self, meals: Vec<Meal>) -> usize {
        self.cache.append(meals)
    }

    /// Rebuild the browse feed: fetch one page per browse letter and merge
    /// them through the deduplicating append, since adjacent pages overlap
    /// in practice. Returns how many meals ended up cached.
    pub fn browse_and_cache(&mut self, provider: &dyn MealProvider) -> Result<usize, DataError> {
        self.cache.replace(Vec::new());
        for letter in BROWSE_LETTERS {
            let page = provider.search(&letter.to_string(), SearchKind::FirstLetter)?;
            self.cache.append(page);
        }
        Ok(self.cache.len())
    }

    /// Run a search and fold the results into the session cache without
    /// overwriting anything already seen. Returns the fetched results.
    pub fn search_and_cache(
        &mut self,
        provider: &dyn MealProvider,
        query: &str,
        kind: SearchKind,
    ) -> Result<Vec<Meal>, DataError> {
        let results = provider.search(query, kind)?;
        self.cache.append(results.clone());
        Ok(results)
    }

    /// Resolve a meal by id: the cache answers when it holds a full record,
    /// otherwise the provider is asked and the result cached.
    pub fn lookup_meal(
        &mut self,
        provider: &dyn MealProvider,
        id: &str,
    ) -> Result<Option<Meal>, DataError> {
        if let Some(meal) = self.cache.get(id) {
            if meal.instructions.is_some() {
                return Ok(Some(meal.clone()));
            }
        }
        let fetched = provider.lookup(id)?;
        if let Some(meal) = &fetched {
            self.cache.append(vec![meal.clone()]);
        }
        Ok(fetched)
    }

    /// Fetch one random meal and cache it.
    pub fn random_meal(&mut self, provider: &dyn MealProvider) -> Result<Option<Meal>, DataError> {
        let fetched = provider.random()?;
        if let Some(meal) = &fetched {
            self.cache.append(vec![meal.clone()]);
        }
        Ok(fetched)
    }

    pub fn list_categories(
        &self,
        provider: &dyn MealProvider,
    ) -> Result<Vec<Category>, DataError> {
        provider.categories()
    }

    // --- Backup / restore ---

    /// Serialize the selected stores into a portable document.
    pub fn backup(
        &self,
        selection: BackupSelection,
        mode: ImageMode,
    ) -> Result<BackupOutcome, DataError> {
        backup::build_backup(
            selection,
            mode,
            self.personal.recipes(),
            self.vault.meals(),
            self.notes.notes(),
        )
    }

    /// Apply a backup document. Each recognized key fully replaces its
    /// store, in the fixed order recipes, vault, notes; a document with no
    /// recognized keys leaves every store untouched (the report comes back
    /// empty). Embedded images are rewritten to fresh local files before
    /// the recipe store is replaced.
    pub fn restore(&mut self, input: &str) -> Result<RestoreReport> {
        let (restored, report) = backup::parse_restore(input, &self.images_dir)?;

        if let Some(recipes) = restored.recipes {
            self.personal.replace_all(recipes);
            self.persist_personal()?;
        }
        if let Some(meals) = restored.vault {
            self.vault.replace_all(meals);
            self.persist_vault()?;
        }
        if let Some(notes) = restored.notes {
            self.notes.replace_all(notes);
            self.persist_notes()?;
        }

        Ok(report)
    }

    // --- Persistence write-through ---

    fn persist_vault(&self) -> Result<()> {
        let doc = serde_json::to_string(self.vault.meals())?;
        self.db.put_document(VAULT_KEY, &doc)
    }

    fn persist_personal(&self) -> Result<()> {
        let doc = serde_json::to_string(self.personal.recipes())?;
        self.db.put_document(PERSONAL_KEY, &doc)
    }

    fn persist_notes(&self) -> Result<()> {
        let doc = serde_json::to_string(self.notes.notes())?;
        self.db.put_document(NOTES_KEY, &doc)
    }

    fn persist_prefs(&self) -> Result<()> {
        let doc = serde_json::to_string(&self.prefs.preferences())?;
        self.db.put_document(PREFS_KEY, &doc)
    }
}

/// Load one store document, falling back to the default for a missing key.
/// A corrupt document is logged and treated as missing rather than
/// bricking startup.
fn load_document<T: DeserializeOwned + Default>(db: &Database, key: &str) -> Result<T> {
    match db.get_document(key)? {
        Some(doc) => match serde_json::from_str(&doc) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable store document");
                Ok(T::default())
            }
        },
        None => Ok(T::default()),
    }
}

fn remove_local_images(meal: &Meal) {
    for reference in local_image_refs(meal) {
        images::remove_local(reference);
    }
}

fn local_image_refs(meal: &Meal) -> Vec<&str> {
    meal.thumbnail
        .as_deref()
        .into_iter()
        .chain(meal.ingredients.iter().filter_map(|i| i.image.as_deref()))
        .filter(|r| ImageRef::is_local(r))
        .collect()
}
