mod http;

pub use http::HttpCatalogClient;

use crate::error::CatalogError;
use crate::model::{Category, Cursor, Page, Recipe};
use async_trait::async_trait;

/// Read-only access to the remote recipe catalog
#[async_trait]
pub trait RemoteCatalogClient: Send + Sync {
    /// Fetch a single recipe by its title within a category
    async fn fetch_by_title(&self, title: &str, category: &str) -> Result<Recipe, CatalogError>;

    /// Fetch one page of a category listing starting at `cursor`, narrowed
    /// to titles containing `query` when it is not blank
    async fn fetch_page(
        &self,
        category: &str,
        query: &str,
        cursor: Cursor,
    ) -> Result<Page<Recipe>, CatalogError>;

    async fn fetch_top_recipes(&self) -> Result<Vec<Recipe>, CatalogError>;

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError>;
}
