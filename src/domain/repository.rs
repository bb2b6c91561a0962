use crate::domain::models::{Recipe, RecipeCategory, RecipeFilter, RecipeLike};
use crate::domain::user::{Profile, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DomainError::Conflict` if the email or username is taken.
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn update_user(&self, user: User) -> Result<()>;
    /// Removes the user with their profile, likes and authored recipes.
    async fn delete_user(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn save_profile(&self, profile: Profile) -> Result<()>;
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;
    async fn update_profile(&self, profile: Profile) -> Result<()>;
}

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn get_or_create_category(&self, name: &str) -> Result<RecipeCategory>;
    async fn find_category(&self, id: Uuid) -> Result<Option<RecipeCategory>>;
    async fn list_categories(&self) -> Result<Vec<RecipeCategory>>;
    async fn save_recipe(&self, recipe: Recipe) -> Result<()>;
    async fn find_recipe(&self, id: Uuid) -> Result<Option<Recipe>>;
    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>>;
    async fn update_recipe(&self, recipe: Recipe) -> Result<()>;
    /// Removes the recipe together with its likes and every bookmark of it.
    async fn delete_recipe(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Atomic constrained insert: a second like for the same (user, recipe)
    /// fails with `DomainError::Conflict` and leaves the store untouched.
    async fn insert_like(&self, like: RecipeLike) -> Result<RecipeLike>;
    async fn delete_like(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool>;
    async fn count_likes(&self, recipe_id: Uuid) -> Result<usize>;
    /// Distinct recipes with at least one like created in `[from, to)`.
    async fn recipes_liked_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Recipe>>;
}

#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Returns `true` if the set changed.
    async fn add_bookmark(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool>;
    /// Returns `true` if the set changed.
    async fn remove_bookmark(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool>;
    async fn list_bookmarks(&self, user_id: Uuid) -> Result<Vec<Recipe>>;
    async fn count_bookmarks(&self, recipe_id: Uuid) -> Result<usize>;
}
