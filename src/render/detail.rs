use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Instructions, Nutrient, RecipeDetail, RecipeId, RecipeSummary};
use crate::render::card::{meta_items, HeartIcon, MetaItem};
use crate::render::image::upscale_image_url;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub const NO_INSTRUCTIONS: &str = "No instructions available for this recipe.";

/// A nutrient line, amounts rounded to whole units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutrientRow {
    pub label: &'static str,
    pub amount: i64,
    pub unit: String,
    pub percent_of_daily_needs: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutrientGroup {
    pub title: &'static str,
    pub rows: Vec<NutrientRow>,
}

/// Nutrition facts per serving: calories featured, the three macros in the
/// primary grid, everything else in a collapsible breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutritionView {
    pub calories: Option<i64>,
    pub macros: Vec<NutrientRow>,
    pub details: Vec<NutrientGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionsView {
    Steps(Vec<StepView>),
    Text(String),
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: RecipeId,
    pub title: String,
    pub hero_image_url: String,
    pub meta: Vec<MetaItem>,
    pub heart: HeartIcon,
    pub pressed: bool,
    pub save_label: &'static str,
    pub description: Option<String>,
    pub nutrition: Option<NutritionView>,
    pub ingredients: Vec<String>,
    pub instructions: InstructionsView,
    pub source_url: Option<String>,
    pub summary: RecipeSummary,
}

/// Outcome of opening a recipe page
#[derive(Debug, Clone, PartialEq)]
pub enum RecipePage {
    Found(Box<DetailView>),
    NotFound { heading: String, message: String },
    Unavailable { heading: String, message: String },
    NoneSelected { heading: String, message: String },
}

impl RecipePage {
    pub fn not_found() -> Self {
        RecipePage::NotFound {
            heading: "Recipe Not Found".to_string(),
            message: "Sorry, we couldn't find that recipe. It may have been removed or the ID is incorrect."
                .to_string(),
        }
    }

    pub fn unavailable() -> Self {
        RecipePage::Unavailable {
            heading: "Recipe Unavailable".to_string(),
            message: "We couldn't load this recipe right now. Please try again.".to_string(),
        }
    }

    pub fn none_selected() -> Self {
        RecipePage::NoneSelected {
            heading: "No Recipe Selected".to_string(),
            message: "Please select a recipe from the homepage.".to_string(),
        }
    }

    /// Title for the document, `"<recipe> | <site>"` when a recipe was found
    pub fn document_title(&self, site_name: &str) -> String {
        match self {
            RecipePage::Found(view) => format!("{} | {}", view.title, site_name),
            RecipePage::NotFound { heading, .. }
            | RecipePage::Unavailable { heading, .. }
            | RecipePage::NoneSelected { heading, .. } => format!("{} | {}", heading, site_name),
        }
    }
}

fn rounded(value: f64) -> i64 {
    value.round() as i64
}

fn row(label: &'static str, nutrient: &Nutrient) -> NutrientRow {
    NutrientRow {
        label,
        amount: rounded(nutrient.amount),
        unit: if nutrient.unit.is_empty() {
            "g".to_string()
        } else {
            nutrient.unit.clone()
        },
        percent_of_daily_needs: nutrient.percent_of_daily_needs.map(rounded),
    }
}

fn rows(detail: &RecipeDetail, wanted: &[(&'static str, &str)]) -> Vec<NutrientRow> {
    wanted
        .iter()
        .filter_map(|(label, name)| detail.nutrient(name).map(|n| row(label, n)))
        .collect()
}

pub fn render_nutrition(detail: &RecipeDetail) -> Option<NutritionView> {
    detail.nutrition.as_ref()?;

    let macros = rows(
        detail,
        &[("Protein", "Protein"), ("Carbs", "Carbohydrates"), ("Fat", "Fat")],
    );

    let details = [
        NutrientGroup {
            title: "Carbohydrates",
            rows: rows(
                detail,
                &[
                    ("Net Carbs", "Net Carbohydrates"),
                    ("Fiber", "Fiber"),
                    ("Sugar", "Sugar"),
                ],
            ),
        },
        NutrientGroup {
            title: "Fats",
            rows: rows(detail, &[("Saturated Fat", "Saturated Fat")]),
        },
    ]
    .into_iter()
    .filter(|group| !group.rows.is_empty())
    .collect();

    Some(NutritionView {
        calories: detail.nutrient("Calories").map(|n| rounded(n.amount)),
        macros,
        details,
    })
}

/// Reduce service-supplied HTML to plain text
fn plain_text(html: &str) -> String {
    let without_tags = TAG.replace_all(html, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

pub fn render_detail(detail: &RecipeDetail, saved: bool) -> DetailView {
    let summary = &detail.summary;

    let instructions = match &detail.instructions {
        Instructions::Steps(steps) => InstructionsView::Steps(
            steps
                .iter()
                .map(|s| StepView {
                    number: s.number,
                    text: s.text.trim().to_string(),
                })
                .collect(),
        ),
        Instructions::Text(text) => match plain_text(text) {
            t if t.is_empty() => InstructionsView::Missing(NO_INSTRUCTIONS),
            t => InstructionsView::Text(t),
        },
        Instructions::Missing => InstructionsView::Missing(NO_INSTRUCTIONS),
    };

    DetailView {
        id: summary.id,
        title: summary.title.clone(),
        hero_image_url: upscale_image_url(&summary.image_url),
        meta: meta_items(summary),
        heart: HeartIcon::for_saved(saved),
        pressed: saved,
        save_label: if saved { "Saved" } else { "Save Recipe" },
        description: detail
            .description
            .as_deref()
            .map(plain_text)
            .filter(|d| !d.is_empty()),
        nutrition: render_nutrition(detail),
        ingredients: detail
            .ingredients
            .iter()
            .map(|i| i.original_text.clone())
            .filter(|text| !text.trim().is_empty())
            .collect(),
        instructions,
        source_url: detail.source_url.clone(),
        summary: summary.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ingredient, InstructionStep};

    fn nutrient(name: &str, amount: f64, percent: Option<f64>) -> Nutrient {
        Nutrient {
            name: name.to_string(),
            amount,
            unit: "g".to_string(),
            percent_of_daily_needs: percent,
        }
    }

    fn detail(nutrition: Option<Vec<Nutrient>>, instructions: Instructions) -> RecipeDetail {
        RecipeDetail {
            summary: RecipeSummary {
                id: RecipeId::new(716429).unwrap(),
                title: "Pasta with Garlic".to_string(),
                image_url: "https://img.spoonacular.com/recipes/716429-556x370.jpg".to_string(),
                ready_in_minutes: Some(45),
                servings: Some(2),
            },
            ingredients: vec![
                Ingredient {
                    original_text: "1 tbsp butter".to_string(),
                },
                Ingredient {
                    original_text: "  ".to_string(),
                },
            ],
            instructions,
            nutrition,
            source_url: None,
            description: Some("A <b>quick</b> &amp; easy dinner.".to_string()),
        }
    }

    #[test]
    fn test_nutrition_rounds_and_groups() {
        let nutrients = vec![
            Nutrient {
                unit: "kcal".to_string(),
                ..nutrient("Calories", 584.46, Some(29.22))
            },
            nutrient("Protein", 19.5, Some(38.9)),
            nutrient("Carbohydrates", 83.67, Some(27.89)),
            nutrient("Net Carbohydrates", 76.2, None),
            nutrient("Sugar", 4.49, Some(4.99)),
            nutrient("Saturated Fat", 7.5, Some(46.9)),
        ];
        let view = render_nutrition(&detail(Some(nutrients), Instructions::Missing)).unwrap();

        assert_eq!(view.calories, Some(584));
        let labels: Vec<&str> = view.macros.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Protein", "Carbs"]);
        assert_eq!(view.macros[0].amount, 20);
        assert_eq!(view.macros[0].percent_of_daily_needs, Some(39));

        assert_eq!(view.details.len(), 2);
        let carbs: Vec<&str> = view.details[0].rows.iter().map(|r| r.label).collect();
        assert_eq!(carbs, vec!["Net Carbs", "Sugar"]);
        assert_eq!(view.details[1].rows[0].amount, 8);
    }

    #[test]
    fn test_nutrition_drops_empty_groups() {
        let nutrients = vec![nutrient("Calories", 100.0, None)];
        let view = render_nutrition(&detail(Some(nutrients), Instructions::Missing)).unwrap();
        assert!(view.macros.is_empty());
        assert!(view.details.is_empty());
    }

    #[test]
    fn test_absent_nutrition_has_no_block() {
        assert!(render_nutrition(&detail(None, Instructions::Missing)).is_none());
    }

    #[test]
    fn test_render_detail_with_steps() {
        let steps = Instructions::Steps(vec![InstructionStep {
            number: 1,
            text: " Boil the pasta. ".to_string(),
        }]);
        let view = render_detail(&detail(None, steps), true);

        assert_eq!(
            view.hero_image_url,
            "https://img.spoonacular.com/recipes/716429-636x393.jpg"
        );
        assert_eq!(view.save_label, "Saved");
        assert_eq!(view.heart, HeartIcon::Filled);
        assert_eq!(view.ingredients, vec!["1 tbsp butter"]);
        assert_eq!(view.description.as_deref(), Some("A quick & easy dinner."));
        assert_eq!(
            view.instructions,
            InstructionsView::Steps(vec![StepView {
                number: 1,
                text: "Boil the pasta.".to_string()
            }])
        );
    }

    #[test]
    fn test_render_detail_html_instructions_become_text() {
        let text = Instructions::Text("<ol><li>Boil.</li><li>Serve.</li></ol>".to_string());
        let view = render_detail(&detail(None, text), false);
        assert_eq!(
            view.instructions,
            InstructionsView::Text("Boil. Serve.".to_string())
        );
        assert_eq!(view.save_label, "Save Recipe");
        assert!(!view.pressed);
    }

    #[test]
    fn test_render_detail_missing_instructions() {
        let view = render_detail(&detail(None, Instructions::Text("<p></p>".into())), false);
        assert_eq!(view.instructions, InstructionsView::Missing(NO_INSTRUCTIONS));
    }

    #[test]
    fn test_document_title() {
        assert_eq!(
            RecipePage::not_found().document_title("Recipes"),
            "Recipe Not Found | Recipes"
        );
    }
}
