use crate::domain::error::DomainError;
use crate::domain::models::RecipeLike;
use crate::domain::repository::{LikeRepository, RecipeRepository};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// At most one like per (user, recipe). The uniqueness check happens inside
/// the store's insert, never as a separate lookup here.
pub struct LikeService<R: LikeRepository + RecipeRepository> {
    repository: Arc<R>,
}

impl<R: LikeRepository + RecipeRepository> LikeService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    pub async fn add_like(&self, user_id: Uuid, recipe_id: Uuid) -> Result<RecipeLike> {
        let like = self
            .repository
            .insert_like(RecipeLike::new(user_id, recipe_id, Utc::now()))
            .await?;
        info!(like_id = %like.id, "Recipe liked");
        Ok(like)
    }

    #[instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    pub async fn remove_like(&self, user_id: Uuid, recipe_id: Uuid) -> Result<()> {
        self.ensure_recipe(recipe_id).await?;
        if !self.repository.delete_like(user_id, recipe_id).await? {
            warn!("No like to remove");
            return Err(DomainError::NotFound("Recipe is not liked".to_string()).into());
        }
        info!("Recipe like removed");
        Ok(())
    }

    pub async fn like_count(&self, recipe_id: Uuid) -> Result<usize> {
        self.ensure_recipe(recipe_id).await?;
        self.repository.count_likes(recipe_id).await
    }

    async fn ensure_recipe(&self, recipe_id: Uuid) -> Result<()> {
        match self.repository.find_recipe(recipe_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(format!("Recipe not found: {}", recipe_id)).into()),
        }
    }
}
