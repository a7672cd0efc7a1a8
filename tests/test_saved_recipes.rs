use std::fs;

use recipe_browser::saved::SAVED_RECIPES_KEY;
use recipe_browser::storage::{FileStore, KeyValueStore};
use recipe_browser::{RecipeId, RecipeSummary, SavedRecipes};
use tempfile::TempDir;

fn soup() -> RecipeSummary {
    RecipeSummary {
        ready_in_minutes: Some(30),
        ..RecipeSummary::new(
            RecipeId::new(42).unwrap(),
            "Soup",
            "https://img.spoonacular.com/recipes/42-312x231.jpg",
        )
    }
}

#[test]
fn test_saving_twice_keeps_one_entry() {
    let dir = TempDir::new().unwrap();
    let saved = SavedRecipes::new(FileStore::new(dir.path()));
    let id = RecipeId::new(42).unwrap();

    assert!(saved.save(id, &soup()));
    assert!(!saved.save(id, &soup()));

    let list = saved.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].title, "Soup");
    assert_eq!(list[0].ready_in_minutes, Some(30));
    assert!(saved.badge().visible);
}

#[test]
fn test_saved_list_survives_restart() {
    let dir = TempDir::new().unwrap();
    let first = SavedRecipes::new(FileStore::new(dir.path()));
    first.save(RecipeId::new(1).unwrap(), &RecipeSummary::new(RecipeId::new(1).unwrap(), "One", ""));
    first.save(RecipeId::new(2).unwrap(), &RecipeSummary::new(RecipeId::new(2).unwrap(), "Two", ""));
    drop(first);

    let second = SavedRecipes::new(FileStore::new(dir.path()));
    let titles: Vec<String> = second.list().into_iter().map(|e| e.title).collect();
    assert_eq!(titles, vec!["One", "Two"]);

    let raw = fs::read_to_string(dir.path().join("saved_recipes.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["version"], 1);
    assert_eq!(doc["recipes"][1]["id"], 2);
}

#[test]
fn test_reads_document_written_by_earlier_release() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    store
        .set(
            SAVED_RECIPES_KEY,
            r#"[{"id":"42","title":"Soup","image":"soup.jpg","readyInMinutes":30,"servings":"","savedAt":"2024-05-01T08:30:00.000Z"}]"#,
        )
        .unwrap();

    let saved = SavedRecipes::new(store);
    let id = RecipeId::new(42).unwrap();
    assert!(saved.is_saved(id));
    assert_eq!(saved.list()[0].servings, None);

    // Toggling off rewrites the document in the current format
    assert!(!saved.toggle(id, &soup()));
    assert!(saved.list().is_empty());
    let raw = fs::read_to_string(dir.path().join("saved_recipes.json")).unwrap();
    assert_eq!(raw, r#"{"version":1,"recipes":[]}"#);
}

#[test]
fn test_unreadable_document_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("saved_recipes.json"), "not json").unwrap();

    let saved = SavedRecipes::new(FileStore::new(dir.path()));
    assert!(saved.list().is_empty());
    assert!(!saved.badge().visible);

    assert!(saved.save(RecipeId::new(5).unwrap(), &RecipeSummary::new(RecipeId::new(5).unwrap(), "Five", "")));
    assert_eq!(saved.list().len(), 1);
}
