use clap::{Args, Parser, Subcommand};
use log::error;

use recipe_browser::render::{html, InstructionsView};
use recipe_browser::{
    ActiveFilters, CardView, FilterName, RecipeBrowser, RecipeId, RecipePage, SearchOutcome,
};

#[derive(Parser, Debug)]
#[command(
    name = "recipe-browser",
    version,
    about = "Browse, search and save recipes from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print HTML fragments instead of plain text
    #[arg(long, global = true)]
    html: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the most popular recipes
    Popular {
        /// Number of further pages to load
        #[arg(long, default_value_t = 0)]
        more: u32,
    },
    /// Search recipes by keyword and filters
    Search(SearchArgs),
    /// Show one recipe in full
    Show { id: RecipeId },
    /// Save a recipe
    Save { id: RecipeId },
    /// Remove a saved recipe
    Unsave { id: RecipeId },
    /// List saved recipes
    Saved {
        /// Forget every saved recipe
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Search term
    #[arg(default_value = "")]
    query: String,
    #[arg(long)]
    diet: Option<String>,
    #[arg(long)]
    cuisine: Option<String>,
    #[arg(long)]
    intolerances: Option<String>,
    /// Meal type, e.g. "main course"
    #[arg(long = "type")]
    meal_type: Option<String>,
    /// Number of further pages to load
    #[arg(long, default_value_t = 0)]
    more: u32,
}

impl SearchArgs {
    fn filters(&self) -> ActiveFilters {
        let mut filters = ActiveFilters::new();
        for (name, value) in [
            (FilterName::Diet, &self.diet),
            (FilterName::Cuisine, &self.cuisine),
            (FilterName::Intolerances, &self.intolerances),
            (FilterName::MealType, &self.meal_type),
        ] {
            if let Some(value) = value {
                filters.toggle(name, value.as_str());
            }
        }
        filters
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut browser = RecipeBrowser::builder().build()?;

    match cli.command {
        Commands::Popular { more } => {
            let pending = browser.search_mut().begin_popular();
            eprintln!("{}", pending.loading_message());
            let result = pending.send(browser.api()).await;
            let outcome = browser.search_mut().complete(pending, result);
            report(&outcome);
            load_more(&mut browser, more).await?;
            print_results(&browser, cli.html);
        }
        Commands::Search(args) => {
            let pending = browser
                .search_mut()
                .begin_search(&args.query, args.filters())?;
            eprintln!("{}", pending.loading_message());
            let result = pending.send(browser.api()).await;
            let outcome = browser.search_mut().complete(pending, result);
            report(&outcome);
            load_more(&mut browser, args.more).await?;
            print_results(&browser, cli.html);
        }
        Commands::Show { id } => {
            let page = browser.recipe_page(Some(id)).await;
            if cli.html {
                println!("{}", html::page_html(&page));
            } else {
                print_page(&page);
            }
        }
        Commands::Save { id } => match browser.recipe_page(Some(id)).await {
            RecipePage::Found(view) => {
                if browser.saved().is_saved(id) {
                    println!("{} is already saved", view.title);
                } else {
                    browser.toggle_save(&view.summary);
                    print_toast(&browser);
                }
            }
            page => print_page(&page),
        },
        Commands::Unsave { id } => {
            browser.saved().remove(id);
            println!("Recipe removed");
        }
        Commands::Saved { clear } => {
            if clear {
                browser.saved().clear();
                println!("All saved recipes removed");
            } else if let Some(overlay) = browser.open_saved_list() {
                if cli.html {
                    println!("{}", html::overlay_html(&overlay));
                } else {
                    overlay.cards().iter().for_each(print_card);
                }
            } else {
                print_toast(&browser);
            }
        }
    }

    Ok(())
}

async fn load_more(browser: &mut RecipeBrowser, pages: u32) -> Result<(), Box<dyn std::error::Error>> {
    for _ in 0..pages {
        if !browser.search().has_more() {
            break;
        }
        let outcome = browser.load_more().await?;
        report(&outcome);
    }
    Ok(())
}

fn report(outcome: &SearchOutcome) {
    match outcome {
        SearchOutcome::Replaced {
            count,
            total_results,
        } => eprintln!("Showing {} of {} recipes", count, total_results),
        SearchOutcome::Appended { added } => eprintln!("Loaded {} more", added),
        SearchOutcome::Empty { message } | SearchOutcome::NoMore { message } => {
            eprintln!("{}", message)
        }
        SearchOutcome::Failed { message, detail } => {
            error!("{}", detail);
            eprintln!("{}", message);
        }
        SearchOutcome::Stale => {}
    }
}

fn print_results(browser: &RecipeBrowser, as_html: bool) {
    let cards = browser.cards();
    if as_html {
        println!("{}", html::grid_html(&cards, browser.search().has_more()));
    } else {
        cards.iter().for_each(print_card);
    }
}

fn print_card(card: &CardView) {
    let meta: Vec<String> = card
        .meta
        .iter()
        .map(|item| format!("{} {}", item.icon, item.text))
        .collect();
    println!("{} {} [{}]  {}", card.heart.glyph(), card.title, card.id, meta.join("  "));
}

fn print_toast(browser: &RecipeBrowser) {
    if let Some(message) = browser.toaster().current() {
        println!("{}", message);
    }
}

fn print_page(page: &RecipePage) {
    let view = match page {
        RecipePage::Found(view) => view,
        RecipePage::NotFound { heading, message }
        | RecipePage::Unavailable { heading, message }
        | RecipePage::NoneSelected { heading, message } => {
            println!("{}\n{}", heading, message);
            return;
        }
    };

    println!("{} {}", view.heart.glyph(), view.title);
    for item in &view.meta {
        println!("  {} {}", item.icon, item.text);
    }
    if let Some(description) = &view.description {
        println!("\n{}", description);
    }
    if let Some(nutrition) = &view.nutrition {
        println!("\nNutrition Facts (per serving)");
        if let Some(calories) = nutrition.calories {
            println!("  Calories: {}", calories);
        }
        for row in &nutrition.macros {
            println!("  {}: {}{}", row.label, row.amount, row.unit);
        }
    }
    println!("\nIngredients");
    for ingredient in &view.ingredients {
        println!("  - {}", ingredient);
    }
    println!("\nInstructions");
    match &view.instructions {
        InstructionsView::Steps(steps) => {
            for step in steps {
                println!("  {}. {}", step.number, step.text);
            }
        }
        InstructionsView::Text(text) => println!("  {}", text),
        InstructionsView::Missing(message) => println!("  {}", message),
    }
    if let Some(url) = &view.source_url {
        println!("\nSource: {}", url);
    }
}
