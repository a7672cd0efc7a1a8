pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod render;
pub mod saved;
pub mod search;
pub mod storage;

pub use api::{ApiFactory, FilterName, RecipeApi, SearchRequest};
pub use browser::{RecipeBrowser, RecipeBrowserBuilder};
pub use config::BrowserConfig;
pub use error::RecipeError;
pub use model::{RecipeDetail, RecipeId, RecipeSummary, ResultPage, SavedRecipeEntry};
pub use render::{CardView, DetailView, RecipePage};
pub use saved::SavedRecipes;
pub use search::{ActiveFilters, SearchController, SearchOutcome};

use log::debug;

/// Search recipes by keyword using the configured backend
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), recipe_browser::RecipeError> {
/// let page = recipe_browser::search_recipes("pasta").await?;
/// println!("{} recipes", page.total_results);
/// # Ok(())
/// # }
/// ```
pub async fn search_recipes(query: &str) -> Result<ResultPage, RecipeError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(RecipeError::ValidationError(
            "Search query cannot be empty".to_string(),
        ));
    }

    let config = BrowserConfig::load()?;
    let api = ApiFactory::create(&config.api)?;
    debug!("Searching {} for {:?}", api.backend_name(), query);
    api.search(&SearchRequest {
        query: Some(query.to_string()),
        number: search::PAGE_SIZE,
        ..Default::default()
    })
    .await
}

/// Fetch one recipe's full information using the configured backend
pub async fn fetch_recipe(id: RecipeId) -> Result<RecipeDetail, RecipeError> {
    let config = BrowserConfig::load()?;
    let api = ApiFactory::create(&config.api)?;
    api.fetch_by_id(id).await
}
