use crate::model::Recipe;
use crate::repository::RecipeRepository;
use crate::resource::Resource;
use log::{info, warn};
use std::fmt;
use std::sync::Arc;

/// Outcome of a user-triggered save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    AlreadyExists,
    Failed,
}

impl SaveStatus {
    pub fn message(&self) -> &'static str {
        match self {
            SaveStatus::Saved => "Recipe saved successfully",
            SaveStatus::AlreadyExists => "Recipe already exists",
            SaveStatus::Failed => "Unable to save recipe, try again",
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Saves a recipe unless one with the same title is already saved.
///
/// The repository itself overwrites on save; refusing duplicates happens
/// only here.
pub struct SaveRecipe {
    repository: Arc<RecipeRepository>,
}

impl SaveRecipe {
    pub fn new(repository: Arc<RecipeRepository>) -> Self {
        SaveRecipe { repository }
    }

    pub async fn invoke(&self, recipe: Recipe) -> SaveStatus {
        match self.repository.get_local_by_title(&recipe.title).await {
            Resource::Success(Some(_)) => {
                info!("'{}' is already saved", recipe.title);
                SaveStatus::AlreadyExists
            }
            Resource::Success(None) => {
                let title = recipe.title.clone();
                match self.repository.save_recipe(recipe).await {
                    Ok(()) => {
                        info!("Saved '{}'", title);
                        SaveStatus::Saved
                    }
                    Err(e) => {
                        warn!("Saving '{}' failed: {}", title, e);
                        SaveStatus::Failed
                    }
                }
            }
            Resource::Error(_) | Resource::Loading => SaveStatus::Failed,
        }
    }
}
