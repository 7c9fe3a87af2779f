use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A meal record, either fetched from the remote recipe API or authored
/// locally. Filter-style API endpoints return partial records, so every
/// field beyond id and name is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub ingredients: Vec<Ingredient>,
}

/// One ordered ingredient line of a meal. The image reference may be a
/// remote URL, a local file path, or (inside backup documents) a data URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub measure: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<String>,
}

/// A user-authored recipe. Always locally owned, never fetched — the
/// identifier is a millisecond-timestamp string assigned at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecipe {
    #[serde(flatten)]
    pub meal: Meal,
    #[serde(default = "default_true")]
    pub author_owned: bool,
    #[serde(default)]
    pub created_at: String,
}

fn default_true() -> bool {
    true
}

impl PersonalRecipe {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.meal.id
    }
}

/// Input for authoring a personal recipe. The service assigns the
/// identifier and creation timestamp.
#[derive(Debug, Clone, Default)]
pub struct NewPersonalRecipe {
    pub name: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: Option<String>,
    pub youtube: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

/// A recipe category from the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// Theme flags. The two are independent at the data level: `amoled_mode`
/// may be true while `dark_mode` is false — only the presentation layer
/// treats the second flag as conditional on the first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub amoled_mode: bool,
}

/// A personal recipe must carry a non-blank display name. Everything else
/// (category, area, instructions, ingredients) is freeform and optional.
pub fn validate_recipe_title(name: &str) -> Result<(), DataError> {
    if name.trim().is_empty() {
        return Err(DataError::validation("Recipe name must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_recipe_title() {
        assert!(validate_recipe_title("Chicken Karahi").is_ok());
        assert!(validate_recipe_title("").is_err());
        assert!(validate_recipe_title("   ").is_err());
    }

    #[test]
    fn test_meal_deserializes_with_missing_optionals() {
        let meal: Meal =
            serde_json::from_str(r#"{"id":"52772","name":"Teriyaki Chicken"}"#).unwrap();
        assert_eq!(meal.id, "52772");
        assert!(meal.category.is_none());
        assert!(meal.ingredients.is_empty());
    }

    #[test]
    fn test_personal_recipe_flattens_meal_fields() {
        let recipe = PersonalRecipe {
            meal: Meal {
                id: "1700000000000".to_string(),
                name: "Nani's Biryani".to_string(),
                category: Some("Rice".to_string()),
                area: None,
                instructions: None,
                thumbnail: None,
                youtube: None,
                ingredients: vec![],
            },
            author_owned: true,
            created_at: "2024-06-15T12:00:00+00:00".to_string(),
        };
        let json = serde_json::to_value(&recipe).unwrap();
        // Flattened: meal fields sit at the top level of the record.
        assert_eq!(json["id"], "1700000000000");
        assert_eq!(json["name"], "Nani's Biryani");
        assert_eq!(json["author_owned"], true);
    }

    #[test]
    fn test_personal_recipe_author_owned_defaults_true() {
        let recipe: PersonalRecipe = serde_json::from_str(r#"{"id":"1","name":"Toast"}"#).unwrap();
        assert!(recipe.author_owned);
        assert_eq!(recipe.created_at, "");
    }

    #[test]
    fn test_preferences_are_independent() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"dark_mode":false,"amoled_mode":true}"#).unwrap();
        assert!(!prefs.dark_mode);
        assert!(prefs.amoled_mode);
    }
}
