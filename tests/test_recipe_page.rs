use std::sync::Arc;

use mockito::{Matcher, Server, ServerGuard};
use recipe_browser::api::{ProxyClient, SpoonacularClient};
use recipe_browser::render::InstructionsView;
use recipe_browser::storage::MemoryStore;
use recipe_browser::{RecipeApi, RecipeBrowser, RecipeId, RecipePage};

const INFORMATION: &str = r#"{
    "id": 716429,
    "title": "Pasta with Garlic, Scallions, Cauliflower & Breadcrumbs",
    "image": "https://img.spoonacular.com/recipes/716429-556x370.jpg",
    "readyInMinutes": 45,
    "servings": 2,
    "sourceUrl": "https://fullbellysisters.blogspot.com/2012/06/pasta-with-garlic-scallions-cauliflower.html",
    "summary": "You can never have too many <b>main course</b> recipes.",
    "extendedIngredients": [
        {"original": "1 tbsp butter"},
        {"original": "2 cups cauliflower florets"}
    ],
    "analyzedInstructions": [
        {"name": "", "steps": [
            {"number": 1, "step": "Cook the pasta."},
            {"number": 2, "step": "Toss with the cauliflower."}
        ]}
    ],
    "nutrition": {"nutrients": [
        {"name": "Calories", "amount": 584.46, "unit": "kcal", "percentOfDailyNeeds": 29.22},
        {"name": "Protein", "amount": 19.5, "unit": "g", "percentOfDailyNeeds": 38.9},
        {"name": "Fat", "amount": 20.1, "unit": "g", "percentOfDailyNeeds": 30.9},
        {"name": "Fiber", "amount": 7.2, "unit": "g", "percentOfDailyNeeds": 28.8}
    ]}
}"#;

fn browser_for(server: &ServerGuard) -> RecipeBrowser {
    let api = SpoonacularClient::with_base_url("test-key".to_string(), server.url()).unwrap();
    RecipeBrowser::builder()
        .api(Arc::new(api))
        .store(MemoryStore::new())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_detail_page_renders_recipe() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/716429/information")
        .match_query(Matcher::UrlEncoded("includeNutrition".into(), "true".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(INFORMATION)
        .create_async()
        .await;

    let browser = browser_for(&server);
    let page = browser.recipe_page(Some(RecipeId::new(716429).unwrap())).await;
    mock.assert_async().await;

    assert_eq!(
        page.document_title("Recipes"),
        "Pasta with Garlic, Scallions, Cauliflower & Breadcrumbs | Recipes"
    );
    let RecipePage::Found(view) = page else {
        panic!("expected a recipe page");
    };
    assert_eq!(
        view.hero_image_url,
        "https://img.spoonacular.com/recipes/716429-636x393.jpg"
    );
    assert_eq!(view.ingredients.len(), 2);
    assert_eq!(view.save_label, "Save Recipe");
    assert!(matches!(&view.instructions, InstructionsView::Steps(steps) if steps.len() == 2));
    assert_eq!(
        view.description.as_deref(),
        Some("You can never have too many main course recipes.")
    );

    let nutrition = view.nutrition.as_ref().unwrap();
    assert_eq!(nutrition.calories, Some(584));
    let macros: Vec<&str> = nutrition.macros.iter().map(|row| row.label).collect();
    assert_eq!(macros, vec!["Protein", "Fat"]);
    assert_eq!(nutrition.details[0].rows[0].label, "Fiber");
}

#[tokio::test]
async fn test_unknown_recipe_is_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/999999/information")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "failure", "code": 404, "message": "A recipe with the id 999999 does not exist."}"#)
        .create_async()
        .await;

    let browser = browser_for(&server);
    let page = browser.recipe_page(Some(RecipeId::new(999999).unwrap())).await;

    match page {
        RecipePage::NotFound { heading, .. } => assert_eq!(heading, "Recipe Not Found"),
        other => panic!("unexpected page {:?}", other),
    }
}

#[tokio::test]
async fn test_service_outage_is_not_reported_as_missing() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/1/information")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let browser = browser_for(&server);
    let page = browser.recipe_page(Some(RecipeId::new(1).unwrap())).await;
    assert_eq!(page, RecipePage::unavailable());
}

#[tokio::test]
async fn test_missing_id_selects_nothing() {
    let server = Server::new_async().await;
    let browser = browser_for(&server);
    assert_eq!(browser.recipe_page(None).await, RecipePage::none_selected());
    assert!("0".parse::<RecipeId>().is_err());
    assert!("abc".parse::<RecipeId>().is_err());
}

#[tokio::test]
async fn test_proxy_backend_fetches_recipe() {
    let mut server = Server::new_async().await;
    let body = format!(r#"{{"success": true, "data": {}}}"#, INFORMATION);
    let mock = server
        .mock("POST", "/wp-admin/admin-ajax.php")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "get_recipe_by_id".into()),
            Matcher::UrlEncoded("nonce".into(), "n0nce".into()),
            Matcher::UrlEncoded("recipe_id".into(), "716429".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let api = ProxyClient::with_endpoint(
        format!("{}/wp-admin/admin-ajax.php", server.url()),
        "n0nce".to_string(),
    )
    .unwrap();
    assert_eq!(api.backend_name(), "proxy");
    let detail = api.fetch_by_id(RecipeId::new(716429).unwrap()).await.unwrap();
    mock.assert_async().await;

    assert_eq!(detail.summary.servings, Some(2));
    assert_eq!(detail.ingredients[0].original_text, "1 tbsp butter");
}
