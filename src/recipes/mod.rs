//! TheMealDB recipe search
//!
//! Search by name returns summaries for the result list; lookup by id returns
//! the full recipe with its ingredient/measure pairs. Unlike chef tips, errors
//! here are reported to the caller.

use crate::api::{ApiError, TipsRequest};
use crate::config::RecipeSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// TheMealDB spreads ingredients over numbered fields 1..=20
const MAX_INGREDIENTS: usize = 20;

/// One entry of a search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSummary {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealIngredient {
    pub name: String,
    pub measure: String,
}

/// Full recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: String,
    pub youtube: Option<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<MealIngredient>,
}

impl Meal {
    /// Ingredient names, as fed to the chef prompt
    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients.iter().map(|i| i.name.clone()).collect()
    }

    /// Chef request for this recipe, with its area as the cuisine
    pub fn tips_request(&self) -> TipsRequest {
        let request = TipsRequest::new(self.title.clone()).with_ingredients(self.ingredient_names());
        match &self.area {
            Some(area) => request.with_cuisine(area.clone()),
            None => request,
        }
    }
}

fn text(meal: &Value, field: &str) -> Option<String> {
    meal[field]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn id_of(meal: &Value) -> Option<String> {
    // Usually a string, occasionally numeric
    match &meal["idMeal"] {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn meals(json: &Value) -> &[Value] {
    // `{"meals": null}` means no results
    json["meals"].as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Map a `search.php` response. Entries without id or title are skipped.
pub fn parse_search(json: &Value) -> Vec<MealSummary> {
    meals(json)
        .iter()
        .filter_map(|meal| {
            Some(MealSummary {
                id: id_of(meal)?,
                title: text(meal, "strMeal")?,
                image: text(meal, "strMealThumb"),
                category: text(meal, "strCategory"),
                area: text(meal, "strArea"),
            })
        })
        .collect()
}

/// Map a `lookup.php` response
pub fn parse_meal(json: &Value) -> Option<Meal> {
    let meal = meals(json).first()?;

    let ingredients = (1..=MAX_INGREDIENTS)
        .filter_map(|n| {
            let name = text(meal, &format!("strIngredient{}", n))?;
            let measure = text(meal, &format!("strMeasure{}", n)).unwrap_or_default();
            Some(MealIngredient { name, measure })
        })
        .collect();

    let tags = text(meal, "strTags")
        .map(|tags| {
            tags.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(Meal {
        id: id_of(meal)?,
        title: text(meal, "strMeal")?,
        image: text(meal, "strMealThumb"),
        category: text(meal, "strCategory"),
        area: text(meal, "strArea"),
        instructions: text(meal, "strInstructions").unwrap_or_default(),
        youtube: text(meal, "strYoutube"),
        tags,
        ingredients,
    })
}

/// HTTP client for TheMealDB
pub struct RecipeClient {
    settings: RecipeSettings,
    client: Client,
}

impl RecipeClient {
    pub fn new(settings: RecipeSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { settings, client })
    }

    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let url = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            endpoint
        );

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::Provider(format!("{}: {}", status, error_text)))
        }
    }

    /// Search recipes by name. A blank query returns nothing without a request.
    pub async fn search(&self, query: &str) -> Result<Vec<MealSummary>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let json = self.get("search.php", &[("s", query)]).await?;
        let results = parse_search(&json);
        debug!("Recipe search for \"{}\" returned {} meals", query, results.len());

        Ok(results)
    }

    /// Full recipe by TheMealDB id
    pub async fn lookup(&self, id: &str) -> Result<Option<Meal>, ApiError> {
        let json = self.get("lookup.php", &[("i", id.trim())]).await?;
        Ok(parse_meal(&json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn carbonara() -> Value {
        json!({
            "meals": [{
                "idMeal": "52982",
                "strMeal": "Spaghetti alla Carbonara",
                "strCategory": "Pasta",
                "strArea": "Italian",
                "strInstructions": "Boil the pasta.\r\nFry the guanciale.",
                "strMealThumb": "https://www.themealdb.com/images/media/meals/llcbn01574260722.jpg",
                "strTags": "Pasta, ,Italian",
                "strYoutube": "",
                "strIngredient1": "Spaghetti",
                "strMeasure1": "320g",
                "strIngredient2": "Egg Yolks",
                "strMeasure2": "6",
                "strIngredient3": "",
                "strMeasure3": " ",
                "strIngredient4": "Black Pepper",
                "strMeasure4": null,
                "strIngredient20": null
            }]
        })
    }

    #[test]
    fn test_parse_meal() {
        let meal = parse_meal(&carbonara()).unwrap();
        assert_eq!(meal.id, "52982");
        assert_eq!(meal.area.as_deref(), Some("Italian"));
        assert_eq!(meal.youtube, None);
        assert_eq!(meal.tags, vec!["Pasta", "Italian"]);
        assert_eq!(
            meal.ingredient_names(),
            vec!["Spaghetti", "Egg Yolks", "Black Pepper"]
        );
        assert_eq!(meal.ingredients[2].measure, "");

        let request = meal.tips_request();
        assert_eq!(request.dish_name, "Spaghetti alla Carbonara");
        assert_eq!(request.cuisine.as_deref(), Some("Italian"));
        assert_eq!(request.ingredients.len(), 3);
    }

    #[test]
    fn test_parse_search() {
        let json = json!({
            "meals": [
                {"idMeal": "1", "strMeal": "Fish pie", "strArea": "British"},
                {"idMeal": 2, "strMeal": "Fish Soup (Ukha)"},
                {"idMeal": "3"}
            ]
        });
        let results = parse_search(&json);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].area.as_deref(), Some("British"));
        assert_eq!(results[1].id, "2");
        assert_eq!(results[1].category, None);
    }

    #[test]
    fn test_null_meals() {
        let json = json!({"meals": null});
        assert!(parse_search(&json).is_empty());
        assert!(parse_meal(&json).is_none());
    }

    #[tokio::test]
    async fn test_blank_query_short_circuits() {
        let client = RecipeClient::new(RecipeSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert!(client.search("   ").await.unwrap().is_empty());
    }
}
