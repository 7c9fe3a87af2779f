use std::collections::BTreeMap;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::images::{self, ImageRef};
use crate::models::{Meal, PersonalRecipe};

/// Which stores a backup should include. At least one is required.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackupSelection {
    pub recipes: bool,
    pub vault: bool,
    pub notes: bool,
}

impl BackupSelection {
    #[must_use]
    pub fn all() -> Self {
        Self {
            recipes: true,
            vault: true,
            notes: true,
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.recipes || self.vault || self.notes)
    }
}

/// Whether locally-stored images are embedded into the document or left
/// as device-local references that won't resolve anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    TextOnly,
    Inline,
}

/// The portable backup document: one top-level key per selected store.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BackupDocument {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub recipes: Option<Vec<PersonalRecipe>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vault: Option<Vec<Meal>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<BTreeMap<String, String>>,
}

/// What a backup actually produced. A failed image inline is not fatal —
/// that one image simply won't be portable.
#[derive(Debug)]
pub struct BackupOutcome {
    pub document: BackupDocument,
    pub images_inlined: usize,
    pub images_failed: Vec<String>,
}

impl BackupOutcome {
    pub fn to_json(&self) -> Result<String, DataError> {
        serde_json::to_string_pretty(&self.document)
            .map_err(|e| DataError::format(e.to_string()))
    }
}

/// Suggested backup filename, embedding the current date.
#[must_use]
pub fn backup_file_name() -> String {
    format!("tastytabs-backup-{}.json", Local::now().format("%Y-%m-%d"))
}

/// Assemble a backup document from store snapshots.
///
/// With `ImageMode::Inline`, every personal-recipe image field that is a
/// local file reference is re-encoded as a data URI. Remote URLs and
/// already-embedded data strings are never altered.
pub fn build_backup(
    selection: BackupSelection,
    mode: ImageMode,
    recipes: &[PersonalRecipe],
    vault: &[Meal],
    notes: &BTreeMap<String, String>,
) -> Result<BackupOutcome, DataError> {
    if selection.is_empty() {
        return Err(DataError::validation(
            "Select at least one of recipes, vault, or notes to back up",
        ));
    }

    let mut images_inlined = 0;
    let mut images_failed = Vec::new();

    let recipes = selection.recipes.then(|| {
        let mut list = recipes.to_vec();
        if mode == ImageMode::Inline {
            for recipe in &mut list {
                inline_image_field(
                    &mut recipe.meal.thumbnail,
                    &mut images_inlined,
                    &mut images_failed,
                );
                for ingredient in &mut recipe.meal.ingredients {
                    inline_image_field(
                        &mut ingredient.image,
                        &mut images_inlined,
                        &mut images_failed,
                    );
                }
            }
        }
        list
    });

    Ok(BackupOutcome {
        document: BackupDocument {
            recipes,
            vault: selection.vault.then(|| vault.to_vec()),
            notes: selection.notes.then(|| notes.clone()),
        },
        images_inlined,
        images_failed,
    })
}

fn inline_image_field(field: &mut Option<String>, inlined: &mut usize, failed: &mut Vec<String>) {
    let Some(reference) = field.as_deref() else {
        return;
    };
    if !ImageRef::is_local(reference) {
        return;
    }
    match images::inline(reference) {
        Ok(data_uri) => {
            *field = Some(data_uri);
            *inlined += 1;
        }
        Err(e) => {
            // Non-fatal: the field stays a device-local reference.
            tracing::warn!(image = reference, error = %e, "skipping image during backup");
            failed.push(reference.to_string());
        }
    }
}

/// Store collections recovered from a backup document, ready to be applied
/// by the composition root. `None` means the key was absent or wrongly
/// typed — that store must stay untouched.
#[derive(Debug, Default)]
pub struct RestoredStores {
    pub recipes: Option<Vec<PersonalRecipe>>,
    pub vault: Option<Vec<Meal>>,
    pub notes: Option<BTreeMap<String, String>>,
}

/// Per-key account of what a restore did, so the caller can tell the user
/// exactly what was applied and what was dropped.
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    pub images_restored: usize,
    pub image_errors: Vec<String>,
}

impl RestoreReport {
    /// True when the document contained no usable store at all — the
    /// "no valid data" case, in which nothing was mutated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Parse a backup document and prepare store replacements.
///
/// Fails with `DataError::Format` when the input is not a JSON object —
/// that aborts the whole restore. Otherwise each recognized, correctly
/// typed key (`recipes`: array, `vault`: array, `notes`: object) is
/// recovered independently, in that fixed order; unrecognized keys and
/// wrongly-typed recognized keys are skipped without error.
///
/// Embedded images in personal recipes are decoded back to files under
/// `images_dir` before the store replacement is handed back. A failed
/// decode nulls the field for that one record only.
pub fn parse_restore(
    input: &str,
    images_dir: &Path,
) -> Result<(RestoredStores, RestoreReport), DataError> {
    let value: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| DataError::format(format!("not valid JSON: {e}")))?;
    let serde_json::Value::Object(map) = value else {
        return Err(DataError::format("top level is not an object"));
    };

    let mut restored = RestoredStores::default();
    let mut report = RestoreReport::default();

    if let Some(value) = map.get("recipes") {
        match serde_json::from_value::<Vec<PersonalRecipe>>(value.clone()) {
            Ok(mut recipes) => {
                for recipe in &mut recipes {
                    let name = recipe.meal.name.clone();
                    restore_image_field(&mut recipe.meal.thumbnail, images_dir, &name, &mut report);
                    for ingredient in &mut recipe.meal.ingredients {
                        restore_image_field(&mut ingredient.image, images_dir, &name, &mut report);
                    }
                }
                restored.recipes = Some(recipes);
                report.applied.push("recipes".to_string());
            }
            Err(_) => report.skipped.push("recipes".to_string()),
        }
    }

    if let Some(value) = map.get("vault") {
        match serde_json::from_value::<Vec<Meal>>(value.clone()) {
            Ok(meals) => {
                restored.vault = Some(meals);
                report.applied.push("vault".to_string());
            }
            Err(_) => report.skipped.push("vault".to_string()),
        }
    }

    if let Some(value) = map.get("notes") {
        match serde_json::from_value::<BTreeMap<String, String>>(value.clone()) {
            Ok(notes) => {
                restored.notes = Some(notes);
                report.applied.push("notes".to_string());
            }
            Err(_) => report.skipped.push("notes".to_string()),
        }
    }

    Ok((restored, report))
}

fn restore_image_field(
    field: &mut Option<String>,
    images_dir: &Path,
    record: &str,
    report: &mut RestoreReport,
) {
    let Some(reference) = field.as_deref() else {
        return;
    };
    match ImageRef::classify(reference) {
        ImageRef::Remote(_) => {}
        ImageRef::Data(data_uri) => match images::materialize(data_uri, images_dir) {
            Ok(path) => {
                *field = Some(path.to_string_lossy().into_owned());
                report.images_restored += 1;
            }
            Err(e) => {
                tracing::warn!(record, error = %e, "couldn't restore embedded image");
                report.image_errors.push(format!("{record}: {e}"));
                *field = None;
            }
        },
        ImageRef::Local(reference) => {
            // Text-only backups carry device paths that no longer resolve
            // here. Known lossy behavior: the image is gone for good.
            if !images::local_path(reference).exists() {
                *field = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;

    fn meal(id: &str, name: &str) -> Meal {
        Meal {
            id: id.to_string(),
            name: name.to_string(),
            category: Some("Dessert".to_string()),
            area: Some("British".to_string()),
            instructions: Some("Mix and bake.".to_string()),
            thumbnail: Some("https://example.com/thumb.jpg".to_string()),
            youtube: None,
            ingredients: vec![Ingredient {
                name: "Flour".to_string(),
                measure: "200g".to_string(),
                image: None,
            }],
        }
    }

    fn personal(id: &str, name: &str) -> PersonalRecipe {
        PersonalRecipe {
            meal: meal(id, name),
            author_owned: true,
            created_at: "2024-06-15T12:00:00+00:00".to_string(),
        }
    }

    fn sample_notes() -> BTreeMap<String, String> {
        let mut notes = BTreeMap::new();
        notes.insert("52772".to_string(), "less soy sauce next time".to_string());
        notes
    }

    #[test]
    fn test_backup_rejects_empty_selection() {
        let err = build_backup(
            BackupSelection::default(),
            ImageMode::TextOnly,
            &[],
            &[],
            &BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }

    #[test]
    fn test_backup_serializes_only_selected_stores() {
        let selection = BackupSelection {
            recipes: false,
            vault: true,
            notes: true,
        };
        let outcome = build_backup(
            selection,
            ImageMode::TextOnly,
            &[personal("1", "Secret")],
            &[meal("2", "Apple Pie")],
            &sample_notes(),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&outcome.to_json().unwrap()).unwrap();
        assert!(json.get("recipes").is_none());
        assert!(json["vault"].is_array());
        assert!(json["notes"].is_object());
    }

    #[test]
    fn test_backup_text_only_leaves_local_refs() {
        let mut recipe = personal("1", "Karahi");
        recipe.meal.thumbnail = Some("/device/path/karahi.jpg".to_string());
        let selection = BackupSelection {
            recipes: true,
            ..Default::default()
        };
        let outcome = build_backup(
            selection,
            ImageMode::TextOnly,
            &[recipe],
            &[],
            &BTreeMap::new(),
        )
        .unwrap();
        let recipes = outcome.document.recipes.unwrap();
        assert_eq!(
            recipes[0].meal.thumbnail.as_deref(),
            Some("/device/path/karahi.jpg")
        );
        assert_eq!(outcome.images_inlined, 0);
    }

    #[test]
    fn test_backup_inline_encodes_local_images_only() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("karahi.jpg");
        std::fs::write(&img, b"jpegbytes").unwrap();

        let mut recipe = personal("1", "Karahi");
        recipe.meal.thumbnail = Some(img.to_string_lossy().into_owned());
        recipe.meal.ingredients[0].image = Some("https://example.com/flour.png".to_string());

        let selection = BackupSelection {
            recipes: true,
            ..Default::default()
        };
        let outcome = build_backup(
            selection,
            ImageMode::Inline,
            &[recipe],
            &[],
            &BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(outcome.images_inlined, 1);
        assert!(outcome.images_failed.is_empty());
        let recipes = outcome.document.recipes.unwrap();
        assert!(
            recipes[0]
                .meal
                .thumbnail
                .as_deref()
                .unwrap()
                .starts_with("data:image/jpeg;base64,")
        );
        // Remote URL untouched.
        assert_eq!(
            recipes[0].meal.ingredients[0].image.as_deref(),
            Some("https://example.com/flour.png")
        );
    }

    #[test]
    fn test_backup_inline_failure_is_non_fatal() {
        let mut recipe = personal("1", "Karahi");
        recipe.meal.thumbnail = Some("/nowhere/missing.jpg".to_string());
        let selection = BackupSelection {
            recipes: true,
            ..Default::default()
        };
        let outcome = build_backup(
            selection,
            ImageMode::Inline,
            &[recipe],
            &[],
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(outcome.images_failed, vec!["/nowhere/missing.jpg"]);
        // Field left unconverted, backup still produced.
        let recipes = outcome.document.recipes.unwrap();
        assert_eq!(
            recipes[0].meal.thumbnail.as_deref(),
            Some("/nowhere/missing.jpg")
        );
    }

    #[test]
    fn test_backup_file_name_embeds_date() {
        let name = backup_file_name();
        assert!(name.starts_with("tastytabs-backup-"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_restore_rejects_non_json() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            parse_restore("not json at all", dir.path()),
            Err(DataError::Format(_))
        ));
    }

    #[test]
    fn test_restore_rejects_top_level_array() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            parse_restore(r#"[{"id":"1"}]"#, dir.path()),
            Err(DataError::Format(_))
        ));
    }

    #[test]
    fn test_restore_ignores_unknown_and_wrongly_typed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let input = r#"{
            "recipes": [{"id":"1","name":"Karahi"}],
            "vault": {"not":"an array"},
            "unknownKey": 123
        }"#;
        let (restored, report) = parse_restore(input, dir.path()).unwrap();
        assert_eq!(report.applied, vec!["recipes"]);
        assert_eq!(report.skipped, vec!["vault"]);
        assert!(restored.recipes.is_some());
        assert!(restored.vault.is_none());
        assert!(restored.notes.is_none());
    }

    #[test]
    fn test_restore_empty_object_reports_no_valid_data() {
        let dir = tempfile::tempdir().unwrap();
        let (restored, report) = parse_restore("{}", dir.path()).unwrap();
        assert!(report.is_empty());
        assert!(restored.recipes.is_none());
        assert!(restored.vault.is_none());
        assert!(restored.notes.is_none());
    }

    #[test]
    fn test_restore_materializes_embedded_images() {
        let dir = tempfile::tempdir().unwrap();
        let src_dir = tempfile::tempdir().unwrap();
        let img = src_dir.path().join("pic.png");
        let original = b"pngbytes".to_vec();
        std::fs::write(&img, &original).unwrap();

        let mut recipe = personal("1", "Karahi");
        recipe.meal.thumbnail = Some(img.to_string_lossy().into_owned());
        let selection = BackupSelection {
            recipes: true,
            ..Default::default()
        };
        let outcome = build_backup(
            selection,
            ImageMode::Inline,
            &[recipe],
            &[],
            &BTreeMap::new(),
        )
        .unwrap();

        let (restored, report) = parse_restore(&outcome.to_json().unwrap(), dir.path()).unwrap();
        assert_eq!(report.images_restored, 1);
        assert!(report.image_errors.is_empty());

        let thumb = restored.recipes.unwrap()[0].meal.thumbnail.clone().unwrap();
        let restored_path = Path::new(&thumb);
        assert!(restored_path.starts_with(dir.path()));
        // New unique filename, same bytes.
        assert_ne!(restored_path, img.as_path());
        assert_eq!(std::fs::read(restored_path).unwrap(), original);
    }

    #[test]
    fn test_restore_nulls_dangling_local_refs() {
        let dir = tempfile::tempdir().unwrap();
        let input = r#"{"recipes":[{"id":"1","name":"Karahi","thumbnail":"/gone/after/clear.jpg"}]}"#;
        let (restored, report) = parse_restore(input, dir.path()).unwrap();
        assert!(restored.recipes.unwrap()[0].meal.thumbnail.is_none());
        // Intentional lossy behavior, not an error.
        assert!(report.image_errors.is_empty());
    }

    #[test]
    fn test_restore_bad_embedded_image_nulls_that_record_only() {
        let dir = tempfile::tempdir().unwrap();
        let input = r#"{"recipes":[
            {"id":"1","name":"Broken","thumbnail":"data:image/png;base64,!!!"},
            {"id":"2","name":"Fine","thumbnail":"https://example.com/ok.jpg"}
        ]}"#;
        let (restored, report) = parse_restore(input, dir.path()).unwrap();
        let recipes = restored.recipes.unwrap();
        assert!(recipes[0].meal.thumbnail.is_none());
        assert_eq!(
            recipes[1].meal.thumbnail.as_deref(),
            Some("https://example.com/ok.jpg")
        );
        assert_eq!(report.image_errors.len(), 1);
        assert_eq!(report.applied, vec!["recipes"]);
    }

    #[test]
    fn test_text_only_round_trip_preserves_non_image_fields() {
        let dir = tempfile::tempdir().unwrap();
        let recipes = vec![personal("1", "Karahi")];
        let vault = vec![meal("52772", "Teriyaki Chicken")];
        let notes = sample_notes();

        let outcome = build_backup(
            BackupSelection::all(),
            ImageMode::TextOnly,
            &recipes,
            &vault,
            &notes,
        )
        .unwrap();
        let (restored, report) = parse_restore(&outcome.to_json().unwrap(), dir.path()).unwrap();

        assert_eq!(report.applied, vec!["recipes", "vault", "notes"]);
        assert_eq!(restored.recipes.unwrap(), recipes);
        assert_eq!(restored.vault.unwrap(), vault);
        assert_eq!(restored.notes.unwrap(), notes);
    }
}
