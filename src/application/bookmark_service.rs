use crate::domain::error::DomainError;
use crate::domain::models::Recipe;
use crate::domain::repository::{BookmarkRepository, RecipeRepository};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Bookmarks are a set: adding twice or removing something absent is a no-op.
pub struct BookmarkService<R: BookmarkRepository + RecipeRepository> {
    repository: Arc<R>,
}

impl<R: BookmarkRepository + RecipeRepository> BookmarkService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    pub async fn add_bookmark(&self, user_id: Uuid, recipe_id: Uuid) -> Result<()> {
        let changed = self.repository.add_bookmark(user_id, recipe_id).await?;
        debug!(changed = changed, "Bookmark added");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    pub async fn remove_bookmark(&self, user_id: Uuid, recipe_id: Uuid) -> Result<()> {
        if self.repository.find_recipe(recipe_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("Recipe not found: {}", recipe_id)).into());
        }
        let changed = self.repository.remove_bookmark(user_id, recipe_id).await?;
        debug!(changed = changed, "Bookmark removed");
        Ok(())
    }

    /// No ordering guarantee.
    pub async fn list_bookmarks(&self, user_id: Uuid) -> Result<Vec<Recipe>> {
        self.repository.list_bookmarks(user_id).await
    }
}
