use crate::data::memory::InMemoryStore;
use crate::domain::error::DomainError;
use crate::domain::models::{Recipe, RecipeLike};
use crate::domain::repository::LikeRepository;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::collections::hash_map::Entry;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

#[async_trait]
impl LikeRepository for InMemoryStore {
    #[instrument(skip(self, like), fields(user_id = %like.user_id, recipe_id = %like.recipe_id))]
    async fn insert_like(&self, like: RecipeLike) -> Result<RecipeLike> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&like.user_id) {
            return Err(DomainError::NotFound(format!("User not found: {}", like.user_id)).into());
        }
        if !tables.recipes.contains_key(&like.recipe_id) {
            return Err(
                DomainError::NotFound(format!("Recipe not found: {}", like.recipe_id)).into(),
            );
        }
        match tables.likes.entry((like.user_id, like.recipe_id)) {
            Entry::Occupied(_) => {
                warn!("Unique constraint violated on (user, recipe) like");
                Err(DomainError::Conflict("Recipe already liked".to_string()).into())
            }
            Entry::Vacant(slot) => {
                slot.insert(like.clone());
                debug!(like_id = %like.id, "Like inserted");
                Ok(like)
            }
        }
    }

    #[instrument(skip(self), fields(user_id = %user_id, recipe_id = %recipe_id))]
    async fn delete_like(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.likes.remove(&(user_id, recipe_id)).is_some())
    }

    async fn count_likes(&self, recipe_id: Uuid) -> Result<usize> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .filter(|l| l.recipe_id == recipe_id)
            .count())
    }

    #[instrument(skip(self))]
    async fn recipes_liked_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Recipe>> {
        let tables = self.tables.read().await;
        let liked: HashSet<Uuid> = tables
            .likes
            .values()
            .filter(|l| l.created >= from && l.created < to)
            .map(|l| l.recipe_id)
            .collect();
        let mut recipes: Vec<Recipe> = liked
            .iter()
            .filter_map(|id| tables.recipes.get(id).cloned())
            .collect();
        recipes.sort_by_key(|r| r.id);
        debug!(count = recipes.len(), "Selected recipes liked in window");
        Ok(recipes)
    }
}
