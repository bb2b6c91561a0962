use crate::domain::models::{Recipe, RecipeCategory, RecipeLike};
use crate::domain::user::{Profile, User};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Every table sits behind the same lock, so a mutation that spans tables
/// (cascading deletes, the constrained like insert) is one critical section.
#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) users: HashMap<Uuid, User>,
    pub(crate) profiles: HashMap<Uuid, Profile>,
    pub(crate) categories: HashMap<Uuid, RecipeCategory>,
    pub(crate) recipes: HashMap<Uuid, Recipe>,
    pub(crate) likes: HashMap<(Uuid, Uuid), RecipeLike>,
}

impl Tables {
    /// Name of the unique user column `user` would collide on, if any.
    pub(crate) fn unique_field_taken(&self, user: &User) -> Option<&'static str> {
        self.users
            .values()
            .filter(|u| u.id != user.id)
            .find_map(|u| {
                if u.email == user.email {
                    Some("email")
                } else if u.username == user.username {
                    Some("username")
                } else {
                    None
                }
            })
    }

    pub(crate) fn remove_recipe(&mut self, id: Uuid) -> bool {
        if self.recipes.remove(&id).is_none() {
            return false;
        }
        let before = self.likes.len();
        self.likes.retain(|(_, recipe_id), _| *recipe_id != id);
        let likes_removed = before - self.likes.len();

        let mut bookmarks_removed = 0;
        for profile in self.profiles.values_mut() {
            if profile.bookmarks.remove(&id) {
                bookmarks_removed += 1;
            }
        }
        debug!(
            recipe_id = %id,
            likes_removed = likes_removed,
            bookmarks_removed = bookmarks_removed,
            "Recipe removed with dependent relations"
        );
        true
    }

    pub(crate) fn remove_user(&mut self, id: Uuid) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        self.profiles.remove(&id);
        self.likes.retain(|(user_id, _), _| *user_id != id);

        let authored: Vec<Uuid> = self
            .recipes
            .values()
            .filter(|r| r.author_id == id)
            .map(|r| r.id)
            .collect();
        for recipe_id in authored {
            self.remove_recipe(recipe_id);
        }
        true
    }
}

#[derive(Clone)]
pub struct InMemoryStore {
    pub(crate) tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{recipe, user};
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_remove_recipe_cascades_to_likes_and_bookmarks() {
        let store = InMemoryStore::new();
        let author = user("author");
        let fan = user("fan");
        let r = recipe(author.id, "Test Recipe");
        let other = recipe(author.id, "Other Recipe");

        {
            let mut tables = store.tables.write().await;
            for u in [&author, &fan] {
                tables.users.insert(u.id, u.clone());
                let mut profile = Profile::new(u.id);
                profile.bookmarks.insert(r.id);
                profile.bookmarks.insert(other.id);
                tables.profiles.insert(u.id, profile);
            }
            tables.recipes.insert(r.id, r.clone());
            tables.recipes.insert(other.id, other.clone());
            for u in [&author, &fan] {
                tables
                    .likes
                    .insert((u.id, r.id), RecipeLike::new(u.id, r.id, Utc::now()));
            }
            tables.likes.insert(
                (fan.id, other.id),
                RecipeLike::new(fan.id, other.id, Utc::now()),
            );
        }

        let mut tables = store.tables.write().await;
        assert!(tables.remove_recipe(r.id));
        assert!(!tables.recipes.contains_key(&r.id));
        assert!(tables.likes.keys().all(|(_, recipe_id)| *recipe_id != r.id));
        assert_eq!(tables.likes.len(), 1);
        for profile in tables.profiles.values() {
            assert!(!profile.bookmarks.contains(&r.id));
            assert!(profile.bookmarks.contains(&other.id));
        }
    }

    #[tokio::test]
    async fn test_remove_recipe_returns_false_for_unknown_id() {
        let store = InMemoryStore::new();
        let mut tables = store.tables.write().await;
        assert!(!tables.remove_recipe(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn test_remove_user_cascades_to_authored_recipes() {
        let store = InMemoryStore::new();
        let author = user("author");
        let fan = user("fan");
        let r = recipe(author.id, "Test Recipe");

        let mut tables = store.tables.write().await;
        tables.users.insert(author.id, author.clone());
        tables.users.insert(fan.id, fan.clone());
        tables.profiles.insert(author.id, Profile::new(author.id));
        let mut fan_profile = Profile::new(fan.id);
        fan_profile.bookmarks.insert(r.id);
        tables.profiles.insert(fan.id, fan_profile);
        tables.recipes.insert(r.id, r.clone());
        tables
            .likes
            .insert((fan.id, r.id), RecipeLike::new(fan.id, r.id, Utc::now()));

        assert!(tables.remove_user(author.id));
        assert!(tables.recipes.is_empty());
        assert!(tables.likes.is_empty());
        assert!(!tables.profiles.contains_key(&author.id));
        assert!(tables.profiles[&fan.id].bookmarks.is_empty());
    }
}
