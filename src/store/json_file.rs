use super::{page_of, upsert_into, validate, LocalRecipeStore, DEFAULT_PAGE_SIZE};
use crate::error::CatalogError;
use crate::model::{Cursor, Page, Recipe};
use async_trait::async_trait;
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Saved recipes persisted as a JSON array on disk.
///
/// The file is read on first access and rewritten after every mutation. A
/// missing file is treated as an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    page_size: u32,
    records: Mutex<Option<Vec<Recipe>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_page_size(path, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(path: impl Into<PathBuf>, page_size: u32) -> Self {
        JsonFileStore {
            path: path.into(),
            page_size: page_size.max(1),
            records: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<Vec<Recipe>, CatalogError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No store file at {}, starting empty", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, records: &[Recipe]) -> Result<(), CatalogError> {
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Load the records on first access.
    async fn loaded<'a>(
        &self,
        guard: &'a mut Option<Vec<Recipe>>,
    ) -> Result<&'a mut Vec<Recipe>, CatalogError> {
        if guard.is_none() {
            *guard = Some(self.read_file().await?);
        }
        Ok(guard.get_or_insert_with(Vec::new))
    }

    async fn read_records<T>(&self, f: impl FnOnce(&[Recipe]) -> T) -> Result<T, CatalogError> {
        let mut guard = self.records.lock().await;
        let records = self.loaded(&mut guard).await?;
        Ok(f(records.as_slice()))
    }

    /// Apply `f` to a copy of the records and persist it when `f` reports a
    /// change. The loaded records are only replaced once the file is written,
    /// so a failed write leaves memory and disk in agreement.
    async fn update_records(
        &self,
        f: impl FnOnce(&mut Vec<Recipe>) -> bool,
    ) -> Result<(), CatalogError> {
        let mut guard = self.records.lock().await;
        let records = self.loaded(&mut guard).await?;

        let mut updated = records.clone();
        if !f(&mut updated) {
            return Ok(());
        }
        self.write_file(&updated).await?;
        *records = updated;
        Ok(())
    }
}

#[async_trait]
impl LocalRecipeStore for JsonFileStore {
    async fn get_by_title(&self, title: &str) -> Result<Option<Recipe>, CatalogError> {
        self.read_records(|records| records.iter().find(|r| r.title == title).cloned())
            .await
    }

    async fn upsert(&self, recipe: Recipe) -> Result<(), CatalogError> {
        validate(&recipe)?;
        self.update_records(|records| {
            upsert_into(records, recipe);
            true
        })
        .await
    }

    async fn delete_by_titles(&self, titles: &[String]) -> Result<(), CatalogError> {
        self.update_records(|records| {
            let before = records.len();
            records.retain(|r| !titles.contains(&r.title));
            records.len() != before
        })
        .await
    }

    async fn list_saved(&self, query: &str, cursor: Cursor) -> Result<Page<Recipe>, CatalogError> {
        let page_size = self.page_size;
        self.read_records(|records| page_of(records, query, cursor, page_size))
            .await
    }
}
