use crate::data::memory::InMemoryStore;
use crate::domain::error::DomainError;
use crate::domain::models::Recipe;
use crate::domain::repository::BookmarkRepository;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

#[async_trait]
impl BookmarkRepository for InMemoryStore {
    #[instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    async fn add_bookmark(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.recipes.contains_key(&recipe_id) {
            return Err(DomainError::NotFound(format!("Recipe not found: {}", recipe_id)).into());
        }
        let profile = tables
            .profiles
            .get_mut(&user_id)
            .ok_or_else(|| DomainError::NotFound(format!("Profile not found: {}", user_id)))?;
        let changed = profile.bookmarks.insert(recipe_id);
        debug!(changed = changed, "Bookmark add applied");
        Ok(changed)
    }

    #[instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    async fn remove_bookmark(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let profile = tables
            .profiles
            .get_mut(&user_id)
            .ok_or_else(|| DomainError::NotFound(format!("Profile not found: {}", user_id)))?;
        let changed = profile.bookmarks.remove(&recipe_id);
        debug!(changed = changed, "Bookmark remove applied");
        Ok(changed)
    }

    async fn list_bookmarks(&self, user_id: Uuid) -> Result<Vec<Recipe>> {
        let tables = self.tables.read().await;
        let profile = tables
            .profiles
            .get(&user_id)
            .ok_or_else(|| DomainError::NotFound(format!("Profile not found: {}", user_id)))?;
        Ok(profile
            .bookmarks
            .iter()
            .filter_map(|id| tables.recipes.get(id).cloned())
            .collect())
    }

    async fn count_bookmarks(&self, recipe_id: Uuid) -> Result<usize> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .filter(|p| p.bookmarks.contains(&recipe_id))
            .count())
    }
}
