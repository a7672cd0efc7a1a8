//! Response shapes of the recipe service and their conversion into the
//! crate's model types.

use serde::Deserialize;
use serde_json::Value;

use crate::error::RecipeError;
use crate::model::{
    lenient_count, Ingredient, InstructionStep, Instructions, Nutrient, RecipeDetail, RecipeId,
    RecipeSummary, ResultPage,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<RecipeSummary>,
    #[serde(default)]
    pub total_results: u64,
}

impl From<SearchResponse> for ResultPage {
    fn from(response: SearchResponse) -> Self {
        ResultPage {
            total_results: response.total_results,
            results: response.results,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecipeInformation {
    pub id: RecipeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub ready_in_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub servings: Option<u32>,
    #[serde(default)]
    pub extended_ingredients: Vec<WireIngredient>,
    #[serde(default)]
    pub analyzed_instructions: Vec<InstructionBlock>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireIngredient {
    #[serde(default)]
    pub original: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstructionBlock {
    #[serde(default)]
    pub steps: Vec<WireStep>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireStep {
    pub number: u32,
    #[serde(default)]
    pub step: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Nutrition {
    #[serde(default)]
    pub nutrients: Vec<WireNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireNutrient {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub percent_of_daily_needs: Option<f64>,
}

impl From<RecipeInformation> for RecipeDetail {
    fn from(info: RecipeInformation) -> Self {
        // Only the first analysed block is shown; free text is the fallback
        let steps: Vec<InstructionStep> = info
            .analyzed_instructions
            .into_iter()
            .next()
            .map(|block| {
                block
                    .steps
                    .into_iter()
                    .map(|s| InstructionStep {
                        number: s.number,
                        text: s.step,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let instructions = if !steps.is_empty() {
            Instructions::Steps(steps)
        } else {
            match info.instructions {
                Some(text) if !text.trim().is_empty() => Instructions::Text(text),
                _ => Instructions::Missing,
            }
        };

        let nutrition = info
            .nutrition
            .map(|n| n.nutrients)
            .filter(|nutrients| !nutrients.is_empty())
            .map(|nutrients| {
                nutrients
                    .into_iter()
                    .map(|n| Nutrient {
                        name: n.name,
                        amount: n.amount,
                        unit: n.unit,
                        percent_of_daily_needs: n.percent_of_daily_needs,
                    })
                    .collect()
            });

        RecipeDetail {
            summary: RecipeSummary {
                id: info.id,
                title: info.title,
                image_url: info.image.unwrap_or_default(),
                ready_in_minutes: info.ready_in_minutes,
                servings: info.servings,
            },
            ingredients: info
                .extended_ingredients
                .into_iter()
                .map(|i| Ingredient {
                    original_text: i.original,
                })
                .collect(),
            instructions,
            nutrition,
            source_url: info.source_url.filter(|u| !u.is_empty()),
            description: info.summary.filter(|s| !s.is_empty()),
        }
    }
}

/// Detect the service's failure envelope:
/// `{"status": "failure", "code": 404, "message": "..."}`
pub(crate) fn failure_envelope(value: &Value) -> Option<(Option<u64>, String)> {
    if value.get("status").and_then(Value::as_str) != Some("failure") {
        return None;
    }
    let code = value.get("code").and_then(Value::as_u64);
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Request failed")
        .to_string();
    Some((code, message))
}

/// Map a failure to the error taxonomy; 404 on a recipe lookup means not found
pub(crate) fn failure_to_error(
    code: Option<u64>,
    message: String,
    recipe: Option<RecipeId>,
) -> RecipeError {
    match (code, recipe) {
        (Some(404), Some(id)) => RecipeError::NotFoundError(id),
        _ => RecipeError::UpstreamError(message),
    }
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, RecipeError> {
    serde_json::from_value(value)
        .map_err(|e| RecipeError::UpstreamError(format!("Unexpected response shape: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_information_with_steps_and_nutrition() {
        let info: RecipeInformation = serde_json::from_value(json!({
            "id": 716429,
            "title": "Pasta with Garlic",
            "image": "https://img.spoonacular.com/recipes/716429-556x370.jpg",
            "readyInMinutes": 45,
            "servings": 2,
            "extendedIngredients": [{"original": "1 tbsp butter"}, {"original": "2 cloves garlic"}],
            "analyzedInstructions": [{"name": "", "steps": [
                {"number": 1, "step": "Boil the pasta."},
                {"number": 2, "step": "Melt the butter."}
            ]}],
            "instructions": "<ol><li>Boil</li></ol>",
            "nutrition": {"nutrients": [
                {"name": "Calories", "amount": 584.46, "unit": "kcal", "percentOfDailyNeeds": 29.22}
            ]}
        }))
        .unwrap();

        let detail = RecipeDetail::from(info);
        assert_eq!(detail.summary.title, "Pasta with Garlic");
        assert_eq!(detail.ingredients.len(), 2);
        assert!(matches!(detail.instructions, Instructions::Steps(ref s) if s.len() == 2));
        assert_eq!(detail.nutrient("Calories").unwrap().unit, "kcal");
    }

    #[test]
    fn test_information_falls_back_to_text_instructions() {
        let info: RecipeInformation = serde_json::from_value(json!({
            "id": 1,
            "title": "Toast",
            "analyzedInstructions": [],
            "instructions": "Toast the bread.",
            "nutrition": {"nutrients": []}
        }))
        .unwrap();

        let detail = RecipeDetail::from(info);
        assert_eq!(
            detail.instructions,
            Instructions::Text("Toast the bread.".to_string())
        );
        assert!(detail.nutrition.is_none());
    }

    #[test]
    fn test_information_without_any_instructions() {
        let info: RecipeInformation =
            serde_json::from_value(json!({"id": 2, "instructions": "   "})).unwrap();
        assert_eq!(RecipeDetail::from(info).instructions, Instructions::Missing);
    }

    #[test]
    fn test_failure_envelope() {
        let value = json!({"status": "failure", "code": 402, "message": "Daily points limit reached"});
        let (code, message) = failure_envelope(&value).unwrap();
        assert_eq!(code, Some(402));
        assert_eq!(message, "Daily points limit reached");

        assert!(failure_envelope(&json!({"results": []})).is_none());
    }

    #[test]
    fn test_failure_to_error_not_found_only_for_lookups() {
        let id = RecipeId::new(999999).unwrap();
        assert!(matches!(
            failure_to_error(Some(404), "gone".into(), Some(id)),
            RecipeError::NotFoundError(found) if found == id
        ));
        assert!(matches!(
            failure_to_error(Some(404), "gone".into(), None),
            RecipeError::UpstreamError(_)
        ));
    }
}
