use crate::domain::error::DomainError;
use crate::domain::models::{
    CreateRecipe, Recipe, RecipeCategory, RecipeFilter, RecipeView, UpdateRecipe,
};
use crate::domain::repository::{
    BookmarkRepository, LikeRepository, RecipeRepository, UserRepository,
};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct RecipeService<R>
where
    R: RecipeRepository + UserRepository + LikeRepository + BookmarkRepository,
{
    repository: Arc<R>,
}

impl<R> RecipeService<R>
where
    R: RecipeRepository + UserRepository + LikeRepository + BookmarkRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, req), fields(author_id = %author_id, title = %req.title))]
    pub async fn create_recipe(&self, author_id: Uuid, req: CreateRecipe) -> Result<RecipeView> {
        if req.title.trim().is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()).into());
        }
        let category_id = self.resolve_category(req.category.as_deref()).await?;

        let now = Utc::now();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            author_id,
            category_id,
            title: req.title,
            desc: req.desc,
            cook_time: req.cook_time,
            ingredients: req.ingredients,
            procedure: req.procedure,
            picture: req.picture,
            created: now,
            modified: now,
        };
        self.repository.save_recipe(recipe.clone()).await?;
        info!(recipe_id = %recipe.id, "Recipe created");
        self.to_view(recipe).await
    }

    pub async fn get_recipe(&self, id: Uuid) -> Result<RecipeView> {
        let recipe = self.find(id).await?;
        self.to_view(recipe).await
    }

    #[instrument(skip(self))]
    pub async fn list_recipes(&self, filter: RecipeFilter) -> Result<Vec<RecipeView>> {
        let recipes = self.repository.list_recipes(&filter).await?;
        let mut views = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            views.push(self.to_view(recipe).await?);
        }
        Ok(views)
    }

    pub async fn list_categories(&self) -> Result<Vec<RecipeCategory>> {
        self.repository.list_categories().await
    }

    #[instrument(skip(self, req), fields(actor_id = %actor_id, recipe_id = %id))]
    pub async fn update_recipe(
        &self,
        actor_id: Uuid,
        id: Uuid,
        req: UpdateRecipe,
    ) -> Result<RecipeView> {
        let mut recipe = self.find_owned(actor_id, id).await?;

        if let Some(title) = req.title {
            if title.trim().is_empty() {
                return Err(DomainError::Validation("Title is required".to_string()).into());
            }
            recipe.title = title;
        }
        if let Some(desc) = req.desc {
            recipe.desc = desc;
        }
        if let Some(cook_time) = req.cook_time {
            recipe.cook_time = cook_time;
        }
        if let Some(ingredients) = req.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(procedure) = req.procedure {
            recipe.procedure = procedure;
        }
        if let Some(picture) = req.picture {
            recipe.picture = Some(picture);
        }
        if req.category.is_some() {
            recipe.category_id = self.resolve_category(req.category.as_deref()).await?;
        }
        recipe.modified = Utc::now();

        self.repository.update_recipe(recipe.clone()).await?;
        info!("Recipe updated");
        self.to_view(recipe).await
    }

    /// Deleting a recipe also drops its likes and every bookmark of it.
    #[instrument(skip(self), fields(actor_id = %actor_id, recipe_id = %id))]
    pub async fn delete_recipe(&self, actor_id: Uuid, id: Uuid) -> Result<()> {
        self.find_owned(actor_id, id).await?;
        if !self.repository.delete_recipe(id).await? {
            return Err(DomainError::NotFound(format!("Recipe not found: {}", id)).into());
        }
        info!("Recipe deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Recipe> {
        self.repository
            .find_recipe(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Recipe not found: {}", id)).into())
    }

    async fn find_owned(&self, actor_id: Uuid, id: Uuid) -> Result<Recipe> {
        let recipe = self.find(id).await?;
        if recipe.author_id != actor_id {
            warn!(author_id = %recipe.author_id, "Recipe mutation by non-author rejected");
            return Err(
                DomainError::Forbidden("Only the author may modify this recipe".to_string())
                    .into(),
            );
        }
        Ok(recipe)
    }

    async fn resolve_category(&self, name: Option<&str>) -> Result<Option<Uuid>> {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => {
                Ok(Some(self.repository.get_or_create_category(name).await?.id))
            }
            _ => Ok(None),
        }
    }

    async fn to_view(&self, recipe: Recipe) -> Result<RecipeView> {
        let username = self
            .repository
            .find_user_by_id(recipe.author_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_default();
        let category_name = match recipe.category_id {
            Some(id) => self.repository.find_category(id).await?.map(|c| c.name),
            None => None,
        };
        let total_number_of_likes = self.repository.count_likes(recipe.id).await?;
        let total_number_of_bookmarks = self.repository.count_bookmarks(recipe.id).await?;

        Ok(RecipeView {
            recipe,
            username,
            category_name,
            total_number_of_likes,
            total_number_of_bookmarks,
        })
    }
}
