mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::RecipeError;

/// Minimal string key-value store the saved-recipes registry persists into
pub trait KeyValueStore: Send + Sync {
    /// Stored value for `key`, or `None` when nothing has been written yet
    fn get(&self, key: &str) -> Result<Option<String>, RecipeError>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), RecipeError>;
}
