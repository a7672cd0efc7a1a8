//! Transient feedback: toast messages and the saved-recipes overlay.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;

use crate::model::{RecipeId, SavedRecipeEntry};
use crate::render::{detail_href, render_card, CardView};
use crate::saved::SavedRecipes;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Default)]
struct ToastState {
    message: Option<String>,
    generation: u64,
}

/// Shows one message at a time. A new toast replaces the displayed text and
/// only the most recent toast's timer hides it.
#[derive(Debug, Clone)]
pub struct Toaster {
    state: Arc<Mutex<ToastState>>,
    duration: Duration,
}

impl Default for Toaster {
    fn default() -> Self {
        Toaster::new(DEFAULT_TOAST_DURATION)
    }
}

impl Toaster {
    pub fn new(duration: Duration) -> Self {
        Toaster {
            state: Arc::new(Mutex::new(ToastState::default())),
            duration,
        }
    }

    pub fn toast(&self, message: impl Into<String>) {
        self.toast_for(message, self.duration);
    }

    pub fn toast_for(&self, message: impl Into<String>, duration: Duration) {
        let message = message.into();
        debug!("Toast: {}", message);
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.message = Some(message);
            state.generation
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let state = Arc::clone(&self.state);
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    let mut state = state.lock();
                    if state.generation == generation {
                        state.message = None;
                    }
                });
            }
            // Without a runtime the toast stays up until replaced or dismissed
            Err(_) => debug!("No async runtime; toast will not auto-dismiss"),
        }
    }

    /// Text currently on screen
    pub fn current(&self) -> Option<String> {
        self.state.lock().message.clone()
    }

    pub fn dismiss(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.message = None;
    }
}

/// Overlay listing every saved recipe
#[derive(Debug, Clone)]
pub struct SavedListOverlay {
    entries: Vec<SavedRecipeEntry>,
    open: bool,
}

impl SavedListOverlay {
    /// Open the overlay, or toast and return `None` when nothing is saved
    pub fn open(saved: &SavedRecipes, toaster: &Toaster) -> Option<Self> {
        let entries = saved.list();
        if entries.is_empty() {
            toaster.toast("No saved recipes yet!");
            return None;
        }
        Some(SavedListOverlay {
            entries,
            open: true,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn entries(&self) -> &[SavedRecipeEntry] {
        &self.entries
    }

    pub fn cards(&self) -> Vec<CardView> {
        self.entries
            .iter()
            .map(|entry| render_card(&entry.summary(), true))
            .collect()
    }

    /// Leave the overlay for the detail page of `id`
    pub fn view(&mut self, id: RecipeId) -> Option<String> {
        if !self.entries.iter().any(|entry| entry.id == id) {
            return None;
        }
        self.open = false;
        Some(detail_href(id))
    }

    /// Unsave `id` and drop it from the overlay; closes once the list is empty
    pub fn remove(&mut self, id: RecipeId, saved: &SavedRecipes, toaster: &Toaster) {
        saved.remove(id);
        self.entries.retain(|entry| entry.id != id);
        if self.entries.is_empty() && self.open {
            self.open = false;
            toaster.toast("All saved recipes removed");
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecipeSummary;
    use crate::storage::MemoryStore;

    fn id(n: u64) -> RecipeId {
        RecipeId::new(n).unwrap()
    }

    fn saved_with(ids: &[u64]) -> SavedRecipes {
        let saved = SavedRecipes::new(MemoryStore::new());
        for n in ids {
            saved.save(id(*n), &RecipeSummary::new(id(*n), format!("Recipe {}", n), ""));
        }
        saved
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_auto_dismisses() {
        let toaster = Toaster::default();
        toaster.toast("Recipe saved!");
        assert_eq!(toaster.current().as_deref(), Some("Recipe saved!"));

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(toaster.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_toast_wins() {
        let toaster = Toaster::default();
        toaster.toast("Recipe saved!");
        tokio::time::sleep(Duration::from_millis(1500)).await;
        toaster.toast("Recipe removed");

        // The first toast's timer fires here but must not hide the second
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(toaster.current().as_deref(), Some("Recipe removed"));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(toaster.current(), None);
    }

    #[test]
    fn test_toast_without_runtime_stays_until_dismissed() {
        let toaster = Toaster::default();
        toaster.toast("hello");
        assert_eq!(toaster.current().as_deref(), Some("hello"));
        toaster.dismiss();
        assert_eq!(toaster.current(), None);
    }

    #[test]
    fn test_open_empty_overlay_toasts() {
        let toaster = Toaster::default();
        let overlay = SavedListOverlay::open(&saved_with(&[]), &toaster);
        assert!(overlay.is_none());
        assert_eq!(toaster.current().as_deref(), Some("No saved recipes yet!"));
    }

    #[test]
    fn test_removing_last_entry_closes_overlay() {
        let toaster = Toaster::default();
        let saved = saved_with(&[1, 2]);
        let mut overlay = SavedListOverlay::open(&saved, &toaster).unwrap();
        assert_eq!(overlay.cards().len(), 2);
        assert!(overlay.cards().iter().all(|card| card.pressed));

        overlay.remove(id(1), &saved, &toaster);
        assert!(overlay.is_open());
        assert_eq!(toaster.current(), None);

        overlay.remove(id(2), &saved, &toaster);
        assert!(!overlay.is_open());
        assert!(saved.list().is_empty());
        assert_eq!(
            toaster.current().as_deref(),
            Some("All saved recipes removed")
        );
    }

    #[test]
    fn test_view_navigates_to_detail() {
        let toaster = Toaster::default();
        let saved = saved_with(&[7]);
        let mut overlay = SavedListOverlay::open(&saved, &toaster).unwrap();

        assert_eq!(overlay.view(id(8)), None);
        assert_eq!(overlay.view(id(7)).as_deref(), Some("?recipe=7"));
        assert!(!overlay.is_open());
    }
}
