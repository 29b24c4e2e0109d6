use futures::StreamExt;
use log::{debug, error};
use recipe_catalog::{
    repository_from_config, CatalogConfig, ListSession, ListSource, Recipe, RecipeRepository,
    Resource, SaveRecipe,
};
use std::collections::HashSet;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

const USAGE: &str = "Usage: recipe-catalog <command>

Commands:
  categories                         List recipe categories
  top                                List top recipes
  show <title> <category> [--saved]  Show a recipe, preferring the saved copy with --saved
  list <category> [search]           List recipes in a category, optionally by title
  saved [search]                     List saved recipes, optionally by title
  save <title> <category>            Fetch a recipe and save it
  delete <title>...                  Delete saved recipes";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    let config = match CatalogConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("{:?}", config);

    let repository = match repository_from_config(&config) {
        Ok(repository) => Arc::new(repository),
        Err(e) => {
            error!("Failed to set up repository: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ok = match (command.as_str(), &args[1..]) {
        ("categories", []) => match repository.get_categories().await {
            Resource::Success(categories) => {
                for category in categories {
                    println!("{}", category.name);
                }
                true
            }
            other => report(other),
        },
        ("top", []) => match repository.get_top_recipes().await {
            Resource::Success(recipes) => {
                recipes.iter().for_each(print_summary);
                true
            }
            other => report(other),
        },
        ("show", [title, category, rest @ ..]) => {
            let prefer_local = rest.iter().any(|a| a == "--saved");
            show(&repository, title, category, prefer_local).await
        }
        ("list", [category, search @ ..]) if search.len() <= 1 => {
            let mut session = ListSession::with_threshold(
                ListSource::category(category.as_str()),
                config.prefetch_threshold,
            );
            if let Some(search) = search.first() {
                session.set_query(search);
            }
            list_all(&repository, session).await
        }
        ("saved", search) if search.len() <= 1 => {
            let mut session =
                ListSession::with_threshold(ListSource::saved(), config.prefetch_threshold);
            if let Some(search) = search.first() {
                session.set_query(search);
            }
            list_all(&repository, session).await
        }
        ("save", [title, category]) => {
            match repository.resolve_by_title(title, category, false).await {
                Resource::Success(recipe) => {
                    let status = SaveRecipe::new(Arc::clone(&repository))
                        .invoke(recipe)
                        .await;
                    println!("{}", status);
                    true
                }
                other => report(other),
            }
        }
        ("delete", titles) if !titles.is_empty() => {
            let titles: HashSet<String> = titles.iter().cloned().collect();
            match repository.delete_recipes(&titles).await {
                Ok(()) => true,
                Err(e) => {
                    error!("Failed to delete recipes: {}", e);
                    false
                }
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            false
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn show(
    repository: &RecipeRepository,
    title: &str,
    category: &str,
    prefer_local: bool,
) -> bool {
    let mut updates = Box::pin(repository.get_by_title(title, category, prefer_local));
    let mut ok = false;

    while let Some(update) = updates.next().await {
        match update {
            Resource::Loading => debug!("Loading '{}'", title),
            Resource::Success(recipe) => {
                print_recipe(&recipe);
                ok = true;
            }
            Resource::Error(message) => eprintln!("{}", message),
        }
    }
    ok
}

/// Walk a listing to its end, scrolling one row at a time.
async fn list_all(repository: &RecipeRepository, mut session: ListSession) -> bool {
    let mut row = 0;

    loop {
        let loaded = session.items().len();
        let requested = session.load_more(repository, row).await;
        let controller = session.controller();

        if let Some(message) = controller.last_error() {
            eprintln!("{}", message);
            return false;
        }
        let stalled = requested && row >= loaded && controller.items().len() == loaded;
        if stalled && !controller.end_reached() {
            error!("Received an empty page before the end of the list");
            return false;
        }
        if row < controller.items().len() {
            print_summary(&controller.items()[row]);
            row += 1;
        } else if controller.end_reached() {
            return true;
        }
    }
}

fn report<T>(resource: Resource<T>) -> bool {
    if let Resource::Error(message) = resource {
        eprintln!("{}", message);
    }
    false
}

fn print_summary(recipe: &Recipe) {
    println!("{} [{}]", recipe.title, recipe.category);
}

fn print_recipe(recipe: &Recipe) {
    println!("{}", recipe.title);
    println!("Category: {}", recipe.category);
    println!();
    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient.scaled(1));
    }
    println!();
    println!("Method:");
    for (i, step) in recipe.method.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}
