#![allow(dead_code)]

use async_trait::async_trait;
use recipe_catalog::store::matches_query;
use recipe_catalog::{
    CatalogError, Category, Cursor, Ingredient, LocalRecipeStore, Page, Recipe,
    RemoteCatalogClient,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

pub fn recipe(title: &str, category: &str) -> Recipe {
    Recipe {
        title: title.to_string(),
        category: category.to_string(),
        image_url: format!("https://img.example/{}.jpg", title.to_lowercase()),
        ingredients: vec![Ingredient {
            description: "eggs".to_string(),
            quantity: "2".to_string(),
        }],
        method: vec!["Whisk".to_string(), "Cook".to_string()],
    }
}

/// Remote catalog fake that counts calls and can hold fetches until released
pub struct ScriptedRemote {
    recipes: Mutex<HashMap<String, Recipe>>,
    pages: Mutex<HashMap<(String, u32), Page<Recipe>>>,
    failing: AtomicBool,
    gate: Semaphore,
    by_title_calls: AtomicUsize,
    page_calls: AtomicUsize,
    top_calls: AtomicUsize,
    category_calls: AtomicUsize,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::with_gate(Semaphore::MAX_PERMITS)
    }

    /// Every `fetch_by_title` and `fetch_page` waits for
    /// [`release`](Self::release)
    pub fn gated() -> Self {
        Self::with_gate(0)
    }

    fn with_gate(permits: usize) -> Self {
        ScriptedRemote {
            recipes: Mutex::new(HashMap::new()),
            pages: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            gate: Semaphore::new(permits),
            by_title_calls: AtomicUsize::new(0),
            page_calls: AtomicUsize::new(0),
            top_calls: AtomicUsize::new(0),
            category_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_recipe(self, recipe: Recipe) -> Self {
        self.recipes
            .lock()
            .unwrap()
            .insert(recipe.title.clone(), recipe);
        self
    }

    pub fn with_page(self, category: &str, cursor: u32, page: Page<Recipe>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((category.to_string(), cursor), page);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn release(&self, fetches: usize) {
        self.gate.add_permits(fetches);
    }

    pub fn by_title_calls(&self) -> usize {
        self.by_title_calls.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn top_calls(&self) -> usize {
        self.top_calls.load(Ordering::SeqCst)
    }

    pub fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }

    fn check_failing(&self) -> Result<(), CatalogError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CatalogError::Parse(
                "connection reset by peer at 10.0.0.7:443".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteCatalogClient for ScriptedRemote {
    async fn fetch_by_title(&self, title: &str, _category: &str) -> Result<Recipe, CatalogError> {
        self.by_title_calls.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await.expect("gate closed");
        self.check_failing()?;
        self.recipes
            .lock()
            .unwrap()
            .get(title)
            .cloned()
            .ok_or(CatalogError::Status(404))
    }

    async fn fetch_page(
        &self,
        category: &str,
        query: &str,
        cursor: Cursor,
    ) -> Result<Page<Recipe>, CatalogError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await.expect("gate closed");
        self.check_failing()?;
        let mut page = self
            .pages
            .lock()
            .unwrap()
            .get(&(category.to_string(), cursor.0))
            .cloned()
            .ok_or(CatalogError::Status(404))?;
        page.items.retain(|r| matches_query(&r.title, query));
        Ok(page)
    }

    async fn fetch_top_recipes(&self) -> Result<Vec<Recipe>, CatalogError> {
        self.top_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        Ok(self.recipes.lock().unwrap().values().cloned().collect())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        Ok(vec![
            Category {
                name: "breakfast".to_string(),
                image_url: String::new(),
            },
            Category {
                name: "soups".to_string(),
                image_url: String::new(),
            },
        ])
    }
}

/// Local store whose every call fails
pub struct BrokenStore;

#[async_trait]
impl LocalRecipeStore for BrokenStore {
    async fn get_by_title(&self, _title: &str) -> Result<Option<Recipe>, CatalogError> {
        Err(CatalogError::Store("disk I/O error".to_string()))
    }

    async fn upsert(&self, _recipe: Recipe) -> Result<(), CatalogError> {
        Err(CatalogError::Store("disk I/O error".to_string()))
    }

    async fn delete_by_titles(&self, _titles: &[String]) -> Result<(), CatalogError> {
        Err(CatalogError::Store("disk I/O error".to_string()))
    }

    async fn list_saved(
        &self,
        _query: &str,
        _cursor: Cursor,
    ) -> Result<Page<Recipe>, CatalogError> {
        Err(CatalogError::Store("disk I/O error".to_string()))
    }
}
