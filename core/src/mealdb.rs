use std::collections::HashMap;

use serde::Deserialize;

use crate::models::{Category, Ingredient, Meal};

/// Wire types for TheMealDB JSON API. Every endpoint answers
/// `{"meals": [...]}` with `null` instead of an empty array when nothing
/// matched, and filter endpoints return partial records, so everything
/// here is optional.
#[derive(Debug, Deserialize)]
pub struct MealsResponse {
    pub meals: Option<Vec<ApiMeal>>,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<ApiCategory>,
}

/// A raw meal record. The twenty numbered `strIngredientN`/`strMeasureN`
/// columns land in the flattened map and are paired up during conversion.
#[derive(Debug, Default, Deserialize)]
pub struct ApiMeal {
    #[serde(rename = "idMeal")]
    pub id: Option<String>,
    #[serde(rename = "strMeal")]
    pub name: Option<String>,
    #[serde(rename = "strCategory")]
    pub category: Option<String>,
    #[serde(rename = "strArea")]
    pub area: Option<String>,
    #[serde(rename = "strInstructions")]
    pub instructions: Option<String>,
    #[serde(rename = "strMealThumb")]
    pub thumbnail: Option<String>,
    #[serde(rename = "strYoutube")]
    pub youtube: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCategory {
    #[serde(rename = "idCategory")]
    pub id: Option<String>,
    #[serde(rename = "strCategory")]
    pub name: Option<String>,
    #[serde(rename = "strCategoryThumb")]
    pub thumbnail: Option<String>,
    #[serde(rename = "strCategoryDescription")]
    pub description: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Convert a raw API record into a `Meal`. Records without an identifier
/// or a display name are dropped. Ingredient slots with a blank name are
/// skipped; a missing measure becomes an empty string.
#[must_use]
pub fn api_meal_to_meal(m: ApiMeal) -> Option<Meal> {
    let id = non_empty(m.id)?;
    let name = non_empty(m.name)?;

    let slot = |key: String| -> Option<String> {
        m.extra
            .get(&key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let mut ingredients = Vec::new();
    for i in 1..=20 {
        let Some(ingredient) = slot(format!("strIngredient{i}")) else {
            continue;
        };
        let measure = slot(format!("strMeasure{i}")).unwrap_or_default();
        ingredients.push(Ingredient {
            name: ingredient,
            measure,
            image: None,
        });
    }

    Some(Meal {
        id,
        name,
        category: non_empty(m.category),
        area: non_empty(m.area),
        instructions: non_empty(m.instructions),
        thumbnail: non_empty(m.thumbnail),
        youtube: non_empty(m.youtube),
        ingredients,
    })
}

#[must_use]
pub fn api_category_to_category(c: ApiCategory) -> Option<Category> {
    let name = non_empty(c.name)?;
    Some(Category {
        id: c.id.unwrap_or_default(),
        name,
        thumbnail: non_empty(c.thumbnail),
        description: non_empty(c.description),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_api_meal() -> ApiMeal {
        let mut extra = HashMap::new();
        extra.insert("strIngredient1".to_string(), "soy sauce".into());
        extra.insert("strMeasure1".to_string(), "3/4 cup".into());
        extra.insert("strIngredient2".to_string(), "chicken".into());
        extra.insert("strMeasure2".to_string(), "1 lb".into());
        extra.insert("strIngredient3".to_string(), "".into());
        extra.insert("strMeasure3".to_string(), " ".into());
        extra.insert("strIngredient4".to_string(), serde_json::Value::Null);
        ApiMeal {
            id: Some("52772".to_string()),
            name: Some("Teriyaki Chicken Casserole".to_string()),
            category: Some("Chicken".to_string()),
            area: Some("Japanese".to_string()),
            instructions: Some("Preheat oven to 350.".to_string()),
            thumbnail: Some("https://www.themealdb.com/images/media/meals/wvpsxx.jpg".to_string()),
            youtube: Some("https://www.youtube.com/watch?v=4aZr5hZXP_s".to_string()),
            extra,
        }
    }

    #[test]
    fn test_api_meal_complete() {
        let meal = api_meal_to_meal(full_api_meal()).unwrap();
        assert_eq!(meal.id, "52772");
        assert_eq!(meal.name, "Teriyaki Chicken Casserole");
        assert_eq!(meal.category.as_deref(), Some("Chicken"));
        assert_eq!(meal.area.as_deref(), Some("Japanese"));
        assert_eq!(meal.ingredients.len(), 2);
        assert_eq!(meal.ingredients[0].name, "soy sauce");
        assert_eq!(meal.ingredients[0].measure, "3/4 cup");
    }

    #[test]
    fn test_api_meal_missing_id_or_name() {
        let mut m = full_api_meal();
        m.id = None;
        assert!(api_meal_to_meal(m).is_none());

        let mut m2 = full_api_meal();
        m2.name = Some("  ".to_string());
        assert!(api_meal_to_meal(m2).is_none());
    }

    #[test]
    fn test_api_meal_partial_filter_record() {
        // filter.php endpoints return only id, name and thumbnail.
        let m = ApiMeal {
            id: Some("52893".to_string()),
            name: Some("Apple & Blackberry Crumble".to_string()),
            thumbnail: Some("https://www.themealdb.com/images/media/meals/x.jpg".to_string()),
            ..Default::default()
        };
        let meal = api_meal_to_meal(m).unwrap();
        assert!(meal.category.is_none());
        assert!(meal.instructions.is_none());
        assert!(meal.ingredients.is_empty());
    }

    #[test]
    fn test_api_meal_measure_without_ingredient_is_dropped() {
        let mut m = full_api_meal();
        m.extra
            .insert("strMeasure5".to_string(), "2 tbsp".into());
        let meal = api_meal_to_meal(m).unwrap();
        assert!(meal.ingredients.iter().all(|i| i.measure != "2 tbsp"));
    }

    #[test]
    fn test_meals_response_null_means_no_results() {
        let resp: MealsResponse = serde_json::from_str(r#"{"meals":null}"#).unwrap();
        assert!(resp.meals.is_none());
    }

    #[test]
    fn test_meals_response_parses_real_shape() {
        let resp: MealsResponse = serde_json::from_str(
            r#"{"meals":[{"idMeal":"1","strMeal":"Toast","strIngredient1":"Bread","strMeasure1":"2 slices"}]}"#,
        )
        .unwrap();
        let meal = api_meal_to_meal(resp.meals.unwrap().into_iter().next().unwrap()).unwrap();
        assert_eq!(meal.ingredients.len(), 1);
        assert_eq!(meal.ingredients[0].name, "Bread");
    }

    #[test]
    fn test_api_category() {
        let c = ApiCategory {
            id: Some("3".to_string()),
            name: Some("Dessert".to_string()),
            thumbnail: Some("https://www.themealdb.com/images/category/dessert.png".to_string()),
            description: Some("Sweet courses.".to_string()),
        };
        let category = api_category_to_category(c).unwrap();
        assert_eq!(category.name, "Dessert");

        let empty = ApiCategory {
            id: None,
            name: Some("".to_string()),
            thumbnail: None,
            description: None,
        };
        assert!(api_category_to_category(empty).is_none());
    }
}
