pub mod config;
pub mod error;
pub mod model;
pub mod pagination;
pub mod remote;
pub mod repository;
pub mod resource;
pub mod save_recipe;
pub mod single_flight;
pub mod store;

pub use crate::config::CatalogConfig;
pub use error::CatalogError;
pub use model::{persons_from_slider, Category, Cursor, Ingredient, Page, Recipe};
pub use pagination::{ListSession, PaginationController, PaginationState, PREFETCH_THRESHOLD};
pub use remote::{HttpCatalogClient, RemoteCatalogClient};
pub use repository::{ListSource, RecipeRepository};
pub use resource::Resource;
pub use save_recipe::{SaveRecipe, SaveStatus};
pub use single_flight::FetchKey;
pub use store::{JsonFileStore, LocalRecipeStore, MemoryRecipeStore};

use std::sync::Arc;

/// Wire a repository to the HTTP catalog and the JSON store named in `config`
pub fn repository_from_config(config: &CatalogConfig) -> Result<RecipeRepository, CatalogError> {
    let remote = HttpCatalogClient::new(config)?;
    let local = JsonFileStore::with_page_size(&config.store_path, config.page_size);
    Ok(RecipeRepository::new(Arc::new(remote), Arc::new(local)))
}
