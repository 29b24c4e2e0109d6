use super::{page_of, upsert_into, validate, LocalRecipeStore, DEFAULT_PAGE_SIZE};
use crate::error::CatalogError;
use crate::model::{Cursor, Page, Recipe};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Non-persistent store; contents are lost when dropped
#[derive(Debug)]
pub struct MemoryRecipeStore {
    records: RwLock<Vec<Recipe>>,
    page_size: u32,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        MemoryRecipeStore {
            records: RwLock::new(Vec::new()),
            page_size: page_size.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryRecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocalRecipeStore for MemoryRecipeStore {
    async fn get_by_title(&self, title: &str) -> Result<Option<Recipe>, CatalogError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.title == title).cloned())
    }

    async fn upsert(&self, recipe: Recipe) -> Result<(), CatalogError> {
        validate(&recipe)?;
        upsert_into(&mut *self.records.write().await, recipe);
        Ok(())
    }

    async fn delete_by_titles(&self, titles: &[String]) -> Result<(), CatalogError> {
        self.records
            .write()
            .await
            .retain(|r| !titles.contains(&r.title));
        Ok(())
    }

    async fn list_saved(&self, query: &str, cursor: Cursor) -> Result<Page<Recipe>, CatalogError> {
        let records = self.records.read().await;
        Ok(page_of(&records, query, cursor, self.page_size))
    }
}
