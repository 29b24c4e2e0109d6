use crate::error::CatalogError;
use crate::model::{Category, Cursor, Page, Recipe};
use crate::remote::RemoteCatalogClient;
use crate::resource::{Resource, GENERIC_LOAD_ERROR, GENERIC_STORE_ERROR};
use crate::single_flight::{FetchKey, SingleFlight};
use crate::store::LocalRecipeStore;
use futures::future;
use futures::stream::{self, Stream, StreamExt};
use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;

/// Which listing a paged request reads from, with its title search.
/// A blank query lists everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSource {
    /// Recipes saved in the local store
    Saved { query: String },
    /// A remote catalog category
    Category { name: String, query: String },
}

impl ListSource {
    pub fn saved() -> Self {
        ListSource::Saved {
            query: String::new(),
        }
    }

    pub fn category(name: impl Into<String>) -> Self {
        ListSource::Category {
            name: name.into(),
            query: String::new(),
        }
    }

    /// The same listing searched for `query`, trimmed
    pub fn with_query(&self, query: &str) -> Self {
        let query = query.trim().to_string();
        match self {
            ListSource::Saved { .. } => ListSource::Saved { query },
            ListSource::Category { name, .. } => ListSource::Category {
                name: name.clone(),
                query,
            },
        }
    }

    pub fn query(&self) -> &str {
        match self {
            ListSource::Saved { query } | ListSource::Category { query, .. } => query,
        }
    }
}

/// Decides between the local store and the remote catalog and reports every
/// outcome as a [`Resource`].
///
/// Remote fetches are deduplicated per [`FetchKey`]: a request for a key
/// that is already being fetched waits for that fetch instead of issuing a
/// second call.
pub struct RecipeRepository {
    remote: Arc<dyn RemoteCatalogClient>,
    local: Arc<dyn LocalRecipeStore>,
    recipes: SingleFlight<FetchKey, Recipe>,
    pages: SingleFlight<FetchKey, Page<Recipe>>,
    top_recipes: SingleFlight<FetchKey, Vec<Recipe>>,
    categories: SingleFlight<FetchKey, Vec<Category>>,
}

impl RecipeRepository {
    pub fn new(remote: Arc<dyn RemoteCatalogClient>, local: Arc<dyn LocalRecipeStore>) -> Self {
        RecipeRepository {
            remote,
            local,
            recipes: SingleFlight::new(),
            pages: SingleFlight::new(),
            top_recipes: SingleFlight::new(),
            categories: SingleFlight::new(),
        }
    }

    /// Stream `Loading` followed by exactly one terminal `Success` or `Error`.
    ///
    /// With `prefer_local` a saved copy answers without touching the remote
    /// catalog. A missing or failing local lookup falls through to the remote.
    pub fn get_by_title<'a>(
        &'a self,
        title: &'a str,
        category: &'a str,
        prefer_local: bool,
    ) -> impl Stream<Item = Resource<Recipe>> + Send + 'a {
        stream::once(future::ready(Resource::Loading)).chain(stream::once(
            self.resolve_by_title(title, category, prefer_local),
        ))
    }

    /// Terminal value of [`get_by_title`](Self::get_by_title)
    pub async fn resolve_by_title(
        &self,
        title: &str,
        category: &str,
        prefer_local: bool,
    ) -> Resource<Recipe> {
        if prefer_local {
            match self.local.get_by_title(title).await {
                Ok(Some(recipe)) => {
                    debug!("Serving '{}' from saved recipes", title);
                    return Resource::Success(recipe);
                }
                Ok(None) => debug!("'{}' is not saved, fetching remotely", title),
                Err(e) => warn!(
                    "Local lookup for '{}' failed, fetching remotely: {}",
                    title, e
                ),
            }
        }

        let key = FetchKey::ByTitle {
            title: title.to_string(),
            category: category.to_string(),
        };
        let remote = Arc::clone(&self.remote);
        let (title, category) = (title.to_string(), category.to_string());
        let outcome = self
            .recipes
            .run(key, async move {
                remote
                    .fetch_by_title(&title, &category)
                    .await
                    .map_err(|e| e.to_string())
            })
            .await;

        remote_resource(outcome, "recipe")
    }

    /// Saved copy of a recipe, without remote fallback.
    ///
    /// `Success(None)` means the recipe is not saved; only a failing store
    /// yields `Error`.
    pub async fn get_local_by_title(&self, title: &str) -> Resource<Option<Recipe>> {
        match self.local.get_by_title(title).await {
            Ok(recipe) => Resource::Success(recipe),
            Err(e) => {
                warn!("Local lookup for '{}' failed: {}", title, e);
                Resource::error(GENERIC_STORE_ERROR)
            }
        }
    }

    /// Write a recipe to the local store, replacing any with the same title
    pub async fn save_recipe(&self, recipe: Recipe) -> Result<(), CatalogError> {
        debug!("Saving '{}'", recipe.title);
        self.local.upsert(recipe).await
    }

    /// Remove saved recipes; titles that are not saved are ignored
    pub async fn delete_recipes(&self, titles: &HashSet<String>) -> Result<(), CatalogError> {
        if titles.is_empty() {
            return Ok(());
        }
        let titles: Vec<String> = titles.iter().cloned().collect();
        debug!("Deleting {} saved recipe(s)", titles.len());
        self.local.delete_by_titles(&titles).await
    }

    /// One page of `source` starting at `cursor`
    pub async fn get_page(&self, source: &ListSource, cursor: Cursor) -> Resource<Page<Recipe>> {
        match source {
            ListSource::Saved { query } => match self.local.list_saved(query, cursor).await {
                Ok(page) => Resource::Success(page),
                Err(e) => {
                    warn!("Listing saved recipes at {:?} failed: {}", cursor, e);
                    Resource::error(GENERIC_STORE_ERROR)
                }
            },
            ListSource::Category { name, query } => {
                let key = FetchKey::Page {
                    category: name.clone(),
                    query: query.clone(),
                    cursor: cursor.0,
                };
                let remote = Arc::clone(&self.remote);
                let (category, query) = (name.clone(), query.clone());
                let outcome = self
                    .pages
                    .run(key, async move {
                        remote
                            .fetch_page(&category, &query, cursor)
                            .await
                            .map_err(|e| e.to_string())
                    })
                    .await;

                remote_resource(outcome, "page")
            }
        }
    }

    pub async fn get_top_recipes(&self) -> Resource<Vec<Recipe>> {
        let remote = Arc::clone(&self.remote);
        let outcome = self
            .top_recipes
            .run(FetchKey::TopRecipes, async move {
                remote.fetch_top_recipes().await.map_err(|e| e.to_string())
            })
            .await;

        remote_resource(outcome, "top recipes")
    }

    pub async fn get_categories(&self) -> Resource<Vec<Category>> {
        let remote = Arc::clone(&self.remote);
        let outcome = self
            .categories
            .run(FetchKey::Categories, async move {
                remote.fetch_categories().await.map_err(|e| e.to_string())
            })
            .await;

        remote_resource(outcome, "categories")
    }
}

/// Remote failures are logged with their cause and reported generically.
fn remote_resource<T>(outcome: Result<T, String>, what: &str) -> Resource<T> {
    match outcome {
        Ok(data) => Resource::Success(data),
        Err(e) => {
            warn!("Remote fetch of {} failed: {}", what, e);
            Resource::error(GENERIC_LOAD_ERROR)
        }
    }
}
