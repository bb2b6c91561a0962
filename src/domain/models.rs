use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeCategory {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Recipe {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub desc: String,
    pub cook_time: u32,
    pub ingredients: String,
    pub procedure: String,
    pub picture: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Join record between a user and a recipe. At most one per (user, recipe).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeLike {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub created: DateTime<Utc>,
}

impl RecipeLike {
    pub fn new(user_id: Uuid, recipe_id: Uuid, created: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            recipe_id,
            created,
        }
    }
}

/// Read model returned to clients. Counts are derived on every read.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecipeView {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub username: String,
    pub category_name: Option<String>,
    pub total_number_of_likes: usize,
    pub total_number_of_bookmarks: usize,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CreateRecipe {
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub procedure: String,
    pub picture: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UpdateRecipe {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub cook_time: Option<u32>,
    pub ingredients: Option<String>,
    pub procedure: Option<String>,
    pub picture: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct RecipeFilter {
    pub category: Option<String>,
    pub author: Option<String>,
}
