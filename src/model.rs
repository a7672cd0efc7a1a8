use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::error::RecipeError;

/// Identifier assigned to a recipe by the recipe service.
///
/// Ids reach us as JSON integers from API payloads and as strings from markup
/// attributes, so both forms deserialize to the same integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecipeId(u64);

impl RecipeId {
    pub fn new(id: u64) -> Result<Self, RecipeError> {
        if id == 0 {
            return Err(RecipeError::ValidationError(
                "Recipe id must be a positive integer".to_string(),
            ));
        }
        Ok(RecipeId(id))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecipeId {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let id = trimmed.parse::<u64>().map_err(|_| {
            RecipeError::ValidationError(format!("'{}' is not a valid recipe id", trimmed))
        })?;
        RecipeId::new(id)
    }
}

impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(u64),
            Str(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Int(id) => RecipeId::new(id).map_err(serde::de::Error::custom),
            RawId::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Accepts `30`, `"30"`, `""` or `null` for an optional count.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Int(u32),
        Float(f64),
        Str(String),
    }

    Ok(match Option::<RawCount>::deserialize(deserializer)? {
        Some(RawCount::Int(n)) => Some(n),
        Some(RawCount::Float(f)) if f >= 0.0 && f.round() <= f64::from(u32::MAX) => {
            Some(f.round() as u32)
        }
        Some(RawCount::Str(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Recipe fields shown on a card; rebuilt fresh from every search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: RecipeId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "image", default)]
    pub image_url: String,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub ready_in_minutes: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub servings: Option<u32>,
}

impl RecipeSummary {
    pub fn new(id: RecipeId, title: impl Into<String>, image_url: impl Into<String>) -> Self {
        RecipeSummary {
            id,
            title: title.into(),
            image_url: image_url.into(),
            ready_in_minutes: None,
            servings: None,
        }
    }
}

/// A recipe in the saved-recipes list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipeEntry {
    pub id: RecipeId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "image", default)]
    pub image_url: String,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub ready_in_minutes: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub servings: Option<u32>,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
}

impl SavedRecipeEntry {
    pub fn from_summary(summary: &RecipeSummary, saved_at: OffsetDateTime) -> Self {
        SavedRecipeEntry {
            id: summary.id,
            title: summary.title.clone(),
            image_url: summary.image_url.clone(),
            ready_in_minutes: summary.ready_in_minutes,
            servings: summary.servings,
            saved_at,
        }
    }

    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            ready_in_minutes: self.ready_in_minutes,
            servings: self.servings,
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    pub total_results: u64,
    pub results: Vec<RecipeSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub original_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructionStep {
    pub number: u32,
    pub text: String,
}

/// Structured steps when the service analysed the method, free text otherwise
#[derive(Debug, Clone, PartialEq)]
pub enum Instructions {
    Steps(Vec<InstructionStep>),
    Text(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nutrient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub percent_of_daily_needs: Option<f64>,
}

/// Full recipe record used by the detail view; never cached
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDetail {
    pub summary: RecipeSummary,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Instructions,
    pub nutrition: Option<Vec<Nutrient>>,
    pub source_url: Option<String>,
    pub description: Option<String>,
}

impl RecipeDetail {
    /// Look up a nutrient by its exact service name (e.g. "Net Carbohydrates")
    pub fn nutrient(&self, name: &str) -> Option<&Nutrient> {
        self.nutrition
            .as_ref()
            .and_then(|nutrients| nutrients.iter().find(|n| n.name == name))
    }
}
