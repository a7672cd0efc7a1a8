//! The saved-recipes registry.
//!
//! The whole list lives in one JSON document under [`SAVED_RECIPES_KEY`] and
//! every mutation rewrites it. That is fine for the tens of entries a person
//! saves by hand; it is the scalability ceiling of this design.

use std::collections::HashSet;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::error::RecipeError;
use crate::model::{RecipeId, RecipeSummary, SavedRecipeEntry};
use crate::storage::KeyValueStore;

/// Storage key of the saved-recipes document
pub const SAVED_RECIPES_KEY: &str = "saved_recipes";

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SavedDocument {
    version: u32,
    recipes: Vec<SavedRecipeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Versioned(SavedDocument),
    // Unversioned bare array written by earlier releases
    Legacy(Vec<SavedRecipeEntry>),
}

#[derive(Debug, Error)]
enum LoadError {
    #[error(transparent)]
    Unreadable(#[from] RecipeError),

    #[error("corrupt document: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("unsupported schema version {0}")]
    UnsupportedVersion(u64),
}

/// Saved-count indicator shown next to the saved-recipes button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub count: usize,
    pub visible: bool,
}

impl Badge {
    fn for_count(count: usize) -> Self {
        Badge {
            count,
            visible: count > 0,
        }
    }
}

type BadgeListener = Box<dyn Fn(Badge) + Send + Sync>;

pub struct SavedRecipes {
    store: Box<dyn KeyValueStore>,
    badge_listener: Option<BadgeListener>,
}

impl SavedRecipes {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self::from_boxed(Box::new(store))
    }

    pub fn from_boxed(store: Box<dyn KeyValueStore>) -> Self {
        SavedRecipes {
            store,
            badge_listener: None,
        }
    }

    /// Call `listener` with the new badge state after every mutation
    pub fn with_badge_listener(mut self, listener: impl Fn(Badge) + Send + Sync + 'static) -> Self {
        self.badge_listener = Some(Box::new(listener));
        self
    }

    /// All saved recipes in the order they were saved.
    ///
    /// An absent or unreadable document reads as an empty list.
    pub fn list(&self) -> Vec<SavedRecipeEntry> {
        match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring saved recipes document: {}", e);
                Vec::new()
            }
        }
    }

    pub fn is_saved(&self, id: RecipeId) -> bool {
        self.list().iter().any(|entry| entry.id == id)
    }

    /// Save a recipe. Returns `false` without touching the stored entry when
    /// the id is already saved, or when the document could not be written.
    pub fn save(&self, id: RecipeId, summary: &RecipeSummary) -> bool {
        let Some(mut entries) = self.entries_for_write() else {
            return false;
        };
        if entries.iter().any(|entry| entry.id == id) {
            debug!("Recipe {} already saved", id);
            return false;
        }

        let mut entry = SavedRecipeEntry::from_summary(summary, OffsetDateTime::now_utc());
        entry.id = id;
        entries.push(entry);

        match self.persist(&entries) {
            Ok(()) => {
                info!("Saved recipe {} ({})", id, summary.title);
                self.refresh_badge(entries.len());
                true
            }
            Err(e) => {
                error!("Failed to save recipe {}: {}", id, e);
                false
            }
        }
    }

    /// Remove every entry for `id`; removing an id that is not saved is a no-op
    pub fn remove(&self, id: RecipeId) {
        let Some(mut entries) = self.entries_for_write() else {
            return;
        };
        let before = entries.len();
        entries.retain(|entry| entry.id != id);

        match self.persist(&entries) {
            Ok(()) => {
                if entries.len() != before {
                    info!("Removed recipe {}", id);
                }
                self.refresh_badge(entries.len());
            }
            Err(e) => error!("Failed to remove recipe {}: {}", id, e),
        }
    }

    /// Flip the saved state of `id` and return the new state (`true` = saved)
    pub fn toggle(&self, id: RecipeId, summary: &RecipeSummary) -> bool {
        if self.is_saved(id) {
            self.remove(id);
        } else {
            self.save(id, summary);
        }
        self.is_saved(id)
    }

    /// Forget every saved recipe
    pub fn clear(&self) {
        match self.persist(&[]) {
            Ok(()) => {
                info!("Cleared saved recipes");
                self.refresh_badge(0);
            }
            Err(e) => error!("Failed to clear saved recipes: {}", e),
        }
    }

    pub fn badge(&self) -> Badge {
        Badge::for_count(self.list().len())
    }

    /// The entries a mutation starts from. A corrupt document is replaced;
    /// one that could not be read or was written by a newer release is kept.
    fn entries_for_write(&self) -> Option<Vec<SavedRecipeEntry>> {
        match self.load() {
            Ok(entries) => Some(entries),
            Err(LoadError::Corrupt(e)) => {
                warn!("Replacing corrupt saved recipes document: {}", e);
                Some(Vec::new())
            }
            Err(e) => {
                error!("Not overwriting saved recipes document: {}", e);
                None
            }
        }
    }

    fn load(&self) -> Result<Vec<SavedRecipeEntry>, LoadError> {
        let Some(raw) = self.store.get(SAVED_RECIPES_KEY)? else {
            return Ok(Vec::new());
        };

        // Version first: a newer entry layout is not corruption
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        if let Some(version) = value.get("version").and_then(serde_json::Value::as_u64) {
            if version != u64::from(SCHEMA_VERSION) {
                return Err(LoadError::UnsupportedVersion(version));
            }
        }

        let entries = match serde_json::from_value::<StoredDocument>(value)? {
            StoredDocument::Versioned(doc) => doc.recipes,
            StoredDocument::Legacy(recipes) => recipes,
        };

        // Older documents could hold the same id as both "42" and 42
        let mut seen = HashSet::new();
        Ok(entries
            .into_iter()
            .filter(|entry| seen.insert(entry.id))
            .collect())
    }

    fn persist(&self, entries: &[SavedRecipeEntry]) -> Result<(), RecipeError> {
        let doc = SavedDocument {
            version: SCHEMA_VERSION,
            recipes: entries.to_vec(),
        };
        let json =
            serde_json::to_string(&doc).map_err(|e| RecipeError::StorageError(e.to_string()))?;
        self.store.set(SAVED_RECIPES_KEY, &json)
    }

    fn refresh_badge(&self, count: usize) {
        if let Some(listener) = &self.badge_listener {
            listener(Badge::for_count(count));
        }
    }
}
