use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::api::{ApiFactory, FilterName, RecipeApi};
use crate::config::BrowserConfig;
use crate::error::RecipeError;
use crate::model::{RecipeId, RecipeSummary};
use crate::notify::{SavedListOverlay, Toaster};
use crate::render::{render_card, render_detail, CardView, RecipePage};
use crate::saved::{Badge, SavedRecipes};
use crate::search::{SearchController, SearchOutcome};
use crate::storage::{FileStore, KeyValueStore};

/// Builder for a [`RecipeBrowser`]
///
/// Anything not supplied explicitly comes from [`BrowserConfig::load`].
#[derive(Default)]
pub struct RecipeBrowserBuilder {
    config: Option<BrowserConfig>,
    api: Option<Arc<dyn RecipeApi>>,
    store: Option<Box<dyn KeyValueStore>>,
    toast_duration: Option<Duration>,
    badge_listener: Option<Box<dyn Fn(Badge) + Send + Sync>>,
}

impl RecipeBrowserBuilder {
    /// Use this configuration instead of loading one
    ///
    /// # Example
    /// ```
    /// use recipe_browser::{BrowserConfig, RecipeBrowser};
    ///
    /// let builder = RecipeBrowser::builder().config(BrowserConfig::default());
    /// ```
    pub fn config(mut self, config: BrowserConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a ready-made backend instead of the one named in configuration
    pub fn api(mut self, api: Arc<dyn RecipeApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Persist saved recipes into `store` instead of the configured directory
    ///
    /// # Example
    /// ```
    /// use recipe_browser::{storage::MemoryStore, RecipeBrowser};
    ///
    /// let builder = RecipeBrowser::builder().store(MemoryStore::new());
    /// ```
    pub fn store(mut self, store: impl KeyValueStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = Some(duration);
        self
    }

    /// Called with the new badge state whenever the saved list changes
    pub fn on_badge_change(mut self, listener: impl Fn(Badge) + Send + Sync + 'static) -> Self {
        self.badge_listener = Some(Box::new(listener));
        self
    }

    /// # Errors
    /// Returns `RecipeError` if:
    /// - Configuration cannot be loaded
    /// - The configured backend is unknown or lacks credentials
    /// - No storage directory is configured and none can be derived
    pub fn build(self) -> Result<RecipeBrowser, RecipeError> {
        let config = match self.config {
            Some(config) => config,
            None if self.api.is_some() && self.store.is_some() => BrowserConfig::default(),
            None => BrowserConfig::load()?,
        };

        let api = match self.api {
            Some(api) => api,
            None => ApiFactory::create(&config.api)?,
        };

        let store = match self.store {
            Some(store) => store,
            None => {
                let dir = config.storage.resolve_dir().ok_or_else(|| {
                    RecipeError::StorageError(
                        "No data directory available; set storage.dir".to_string(),
                    )
                })?;
                debug!("Saved recipes stored in {}", dir.display());
                Box::new(FileStore::new(dir))
            }
        };

        let mut saved = SavedRecipes::from_boxed(store);
        if let Some(listener) = self.badge_listener {
            saved = saved.with_badge_listener(listener);
        }

        info!("Recipe browser using the {} backend", api.backend_name());
        Ok(RecipeBrowser {
            search: SearchController::new(Arc::clone(&api)),
            api,
            saved,
            toaster: Toaster::new(
                self.toast_duration
                    .unwrap_or_else(|| config.toast_duration()),
            ),
        })
    }
}

/// A browsing session: the result grid, the saved list and toast feedback
pub struct RecipeBrowser {
    api: Arc<dyn RecipeApi>,
    search: SearchController,
    saved: SavedRecipes,
    toaster: Toaster,
}

impl RecipeBrowser {
    pub fn builder() -> RecipeBrowserBuilder {
        RecipeBrowserBuilder::default()
    }

    pub fn api(&self) -> &dyn RecipeApi {
        self.api.as_ref()
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    /// Mutable access for driving requests through the `begin_*`/`complete` pair
    pub fn search_mut(&mut self) -> &mut SearchController {
        &mut self.search
    }

    pub fn saved(&self) -> &SavedRecipes {
        &self.saved
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn badge(&self) -> Badge {
        self.saved.badge()
    }

    pub async fn load_popular(&mut self) -> SearchOutcome {
        self.search.load_popular().await
    }

    /// Search for `query` with the currently active filter pills
    pub async fn search_for(&mut self, query: &str) -> Result<SearchOutcome, RecipeError> {
        let filters = self.search.filters().clone();
        self.search.run_search(query, filters).await
    }

    /// Flip a filter pill and re-run the current search. With no query and no
    /// pills left there is nothing to search and `None` is returned.
    pub async fn toggle_filter(
        &mut self,
        name: FilterName,
        value: impl Into<String>,
    ) -> Option<SearchOutcome> {
        self.search.toggle_filter(name, value);
        let query = self.search.state().query.clone();
        let filters = self.search.filters().clone();
        match self.search.run_search(&query, filters).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                debug!("Filter change needs no search: {}", e);
                None
            }
        }
    }

    pub async fn load_more(&mut self) -> Result<SearchOutcome, RecipeError> {
        self.search.load_more().await
    }

    /// Cards for the displayed results, hearts reflecting the saved list
    pub fn cards(&self) -> Vec<CardView> {
        let saved = self.saved.list();
        self.search
            .results()
            .iter()
            .map(|summary| render_card(summary, saved.iter().any(|entry| entry.id == summary.id)))
            .collect()
    }

    /// Flip the saved state of a recipe and return its redrawn card
    pub fn toggle_save(&self, summary: &RecipeSummary) -> CardView {
        let saved = self.saved.toggle(summary.id, summary);
        self.toaster
            .toast(if saved { "Recipe saved!" } else { "Recipe removed" });
        render_card(summary, saved)
    }

    /// Page for `?recipe=<id>`; `None` when no id was given
    pub async fn recipe_page(&self, id: Option<RecipeId>) -> RecipePage {
        let Some(id) = id else {
            return RecipePage::none_selected();
        };

        match self.api.fetch_by_id(id).await {
            Ok(detail) => {
                let saved = self.saved.is_saved(id);
                RecipePage::Found(Box::new(render_detail(&detail, saved)))
            }
            Err(RecipeError::NotFoundError(_)) => RecipePage::not_found(),
            Err(e) => {
                warn!("Could not load recipe {}: {}", id, e);
                RecipePage::unavailable()
            }
        }
    }

    pub fn open_saved_list(&self) -> Option<SavedListOverlay> {
        SavedListOverlay::open(&self.saved, &self.toaster)
    }

    pub fn remove_from_overlay(&self, overlay: &mut SavedListOverlay, id: RecipeId) {
        overlay.remove(id, &self.saved, &self.toaster);
    }
}
