use tastytabs_core::error::DataError;
use tastytabs_core::mealdb::{
    CategoriesResponse, MealsResponse, api_category_to_category, api_meal_to_meal,
};
use tastytabs_core::models::{Category, Meal};
use tastytabs_core::service::{MealProvider, SearchKind};

const BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

pub struct TheMealDbClient {
    client: reqwest::Client,
    rt: tokio::runtime::Handle,
}

impl TheMealDbClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "tastytabs-cli/{} (recipe browser)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            rt: tokio::runtime::Handle::current(),
        }
    }

    fn endpoint(kind: SearchKind) -> (&'static str, &'static str) {
        match kind {
            SearchKind::Name => ("search.php", "s"),
            SearchKind::FirstLetter => ("search.php", "f"),
            SearchKind::Ingredient => ("filter.php", "i"),
            SearchKind::Category => ("filter.php", "c"),
            SearchKind::Area => ("filter.php", "a"),
        }
    }

    async fn get_meals(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Meal>, DataError> {
        tracing::debug!(path, "fetching from recipe service");
        let resp = self
            .client
            .get(format!("{BASE_URL}/{path}"))
            .query(query)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(DataError::Network(format!(
                "recipe service answered {}",
                resp.status()
            )));
        }
        let data: MealsResponse = resp
            .json()
            .await
            .map_err(|e| DataError::Network(format!("unreadable response: {e}")))?;

        // `meals: null` is the API's way of saying "no results".
        Ok(data
            .meals
            .unwrap_or_default()
            .into_iter()
            .filter_map(api_meal_to_meal)
            .collect())
    }

    pub async fn search_async(
        &self,
        query: &str,
        kind: SearchKind,
    ) -> Result<Vec<Meal>, DataError> {
        let (path, param) = Self::endpoint(kind);
        self.get_meals(path, &[(param, query)]).await
    }

    pub async fn lookup_async(&self, id: &str) -> Result<Option<Meal>, DataError> {
        let meals = self.get_meals("lookup.php", &[("i", id)]).await?;
        Ok(meals.into_iter().next())
    }

    pub async fn random_async(&self) -> Result<Option<Meal>, DataError> {
        let meals = self.get_meals("random.php", &[]).await?;
        Ok(meals.into_iter().next())
    }

    pub async fn categories_async(&self) -> Result<Vec<Category>, DataError> {
        let resp = self
            .client
            .get(format!("{BASE_URL}/categories.php"))
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(DataError::Network(format!(
                "recipe service answered {}",
                resp.status()
            )));
        }
        let data: CategoriesResponse = resp
            .json()
            .await
            .map_err(|e| DataError::Network(format!("unreadable response: {e}")))?;
        Ok(data
            .categories
            .into_iter()
            .filter_map(api_category_to_category)
            .collect())
    }
}

impl MealProvider for TheMealDbClient {
    fn search(&self, query: &str, kind: SearchKind) -> Result<Vec<Meal>, DataError> {
        self.rt.block_on(self.search_async(query, kind))
    }

    fn lookup(&self, id: &str) -> Result<Option<Meal>, DataError> {
        self.rt.block_on(self.lookup_async(id))
    }

    fn random(&self) -> Result<Option<Meal>, DataError> {
        self.rt.block_on(self.random_async())
    }

    fn categories(&self) -> Result<Vec<Category>, DataError> {
        self.rt.block_on(self.categories_async())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_mapping() {
        assert_eq!(
            TheMealDbClient::endpoint(SearchKind::Name),
            ("search.php", "s")
        );
        assert_eq!(
            TheMealDbClient::endpoint(SearchKind::FirstLetter),
            ("search.php", "f")
        );
        assert_eq!(
            TheMealDbClient::endpoint(SearchKind::Ingredient),
            ("filter.php", "i")
        );
        assert_eq!(
            TheMealDbClient::endpoint(SearchKind::Category),
            ("filter.php", "c")
        );
        assert_eq!(
            TheMealDbClient::endpoint(SearchKind::Area),
            ("filter.php", "a")
        );
    }

    // --- Integration tests (hit the real TheMealDB API) ---

    #[tokio::test]
    #[ignore = "hits TheMealDB API"]
    async fn test_lookup_known_meal() {
        let client = TheMealDbClient::new();
        let meal = client.lookup_async("52772").await.unwrap();
        let meal = meal.expect("meal 52772 should exist");
        assert!(meal.name.to_lowercase().contains("teriyaki"));
        assert!(!meal.ingredients.is_empty());
        assert!(meal.instructions.is_some());
    }

    #[tokio::test]
    #[ignore = "hits TheMealDB API"]
    async fn test_lookup_unknown_meal_is_none() {
        let client = TheMealDbClient::new();
        assert!(client.lookup_async("0").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "hits TheMealDB API"]
    async fn test_search_by_name() {
        let client = TheMealDbClient::new();
        let meals = client
            .search_async("Arrabiata", SearchKind::Name)
            .await
            .unwrap();
        assert!(!meals.is_empty());
        for meal in &meals {
            assert!(!meal.id.is_empty());
            assert!(!meal.name.is_empty());
        }
    }

    #[tokio::test]
    #[ignore = "hits TheMealDB API"]
    async fn test_filter_by_category_returns_partial_records() {
        let client = TheMealDbClient::new();
        let meals = client
            .search_async("Dessert", SearchKind::Category)
            .await
            .unwrap();
        assert!(!meals.is_empty());
        // filter.php omits instructions; the client must tolerate that.
        assert!(meals[0].instructions.is_none());
    }

    #[tokio::test]
    #[ignore = "hits TheMealDB API"]
    async fn test_categories_nonempty() {
        let client = TheMealDbClient::new();
        let categories = client.categories_async().await.unwrap();
        assert!(categories.iter().any(|c| c.name == "Dessert"));
    }
}
