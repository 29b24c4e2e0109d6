mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryRecipeStore;

use crate::error::CatalogError;
use crate::model::{Cursor, Page, Recipe};
use async_trait::async_trait;

/// Default number of saved recipes returned per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Persistent store of saved recipes, keyed uniquely by title
#[async_trait]
pub trait LocalRecipeStore: Send + Sync {
    /// Look up a saved recipe; `Ok(None)` when it does not exist
    async fn get_by_title(&self, title: &str) -> Result<Option<Recipe>, CatalogError>;

    /// Insert a recipe or replace the one with the same title
    async fn upsert(&self, recipe: Recipe) -> Result<(), CatalogError>;

    /// Remove the given titles; absent titles are ignored
    async fn delete_by_titles(&self, titles: &[String]) -> Result<(), CatalogError>;

    /// One page of saved recipes whose title matches `query`, in the order
    /// they were first saved. An empty query matches every recipe; the
    /// cursor counts matching recipes only.
    async fn list_saved(&self, query: &str, cursor: Cursor) -> Result<Page<Recipe>, CatalogError>;
}

fn validate(recipe: &Recipe) -> Result<(), CatalogError> {
    if recipe.title.trim().is_empty() {
        return Err(CatalogError::InvalidRecipe(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Replace in place when the title exists so the saved order is stable.
fn upsert_into(records: &mut Vec<Recipe>, recipe: Recipe) {
    match records.iter_mut().find(|r| r.title == recipe.title) {
        Some(existing) => *existing = recipe,
        None => records.push(recipe),
    }
}

/// Case-insensitive title search; a blank query matches everything.
pub fn matches_query(title: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || title.to_lowercase().contains(&query.to_lowercase())
}

fn page_of(records: &[Recipe], query: &str, cursor: Cursor, page_size: u32) -> Page<Recipe> {
    let matching: Vec<&Recipe> = records
        .iter()
        .filter(|r| matches_query(&r.title, query))
        .collect();
    let start = (cursor.0 as usize).min(matching.len());
    let end = start.saturating_add(page_size as usize).min(matching.len());

    Page {
        items: matching[start..end].iter().map(|r| (*r).clone()).collect(),
        next_cursor: Cursor(end as u32),
        is_last: end >= matching.len(),
    }
}
