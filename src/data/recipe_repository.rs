use crate::data::memory::InMemoryStore;
use crate::domain::error::DomainError;
use crate::domain::models::{Recipe, RecipeCategory, RecipeFilter};
use crate::domain::repository::RecipeRepository;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

#[async_trait]
impl RecipeRepository for InMemoryStore {
    #[instrument(skip(self))]
    async fn get_or_create_category(&self, name: &str) -> Result<RecipeCategory> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.categories.values().find(|c| c.name == name) {
            trace!(category_id = %existing.id, "Category already exists");
            return Ok(existing.clone());
        }
        let category = RecipeCategory {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        tables.categories.insert(category.id, category.clone());
        debug!(category_id = %category.id, name = name, "Category created");
        Ok(category)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<RecipeCategory>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<RecipeCategory>> {
        let tables = self.tables.read().await;
        let mut categories: Vec<_> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    #[instrument(skip(self, recipe), fields(recipe_id = %recipe.id))]
    async fn save_recipe(&self, recipe: Recipe) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&recipe.author_id) {
            return Err(
                DomainError::NotFound(format!("Author not found: {}", recipe.author_id)).into(),
            );
        }
        tables.recipes.insert(recipe.id, recipe);
        debug!("Recipe saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self), fields(recipe_id = %id))]
    async fn find_recipe(&self, id: Uuid) -> Result<Option<Recipe>> {
        let tables = self.tables.read().await;
        Ok(tables.recipes.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        let tables = self.tables.read().await;
        let mut recipes: Vec<Recipe> = tables
            .recipes
            .values()
            .filter(|r| match &filter.category {
                Some(name) => r
                    .category_id
                    .and_then(|id| tables.categories.get(&id))
                    .is_some_and(|c| &c.name == name),
                None => true,
            })
            .filter(|r| match &filter.author {
                Some(username) => tables
                    .users
                    .get(&r.author_id)
                    .is_some_and(|u| &u.username == username),
                None => true,
            })
            .cloned()
            .collect();
        recipes.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(recipes)
    }

    #[instrument(skip(self, recipe), fields(recipe_id = %recipe.id))]
    async fn update_recipe(&self, recipe: Recipe) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.recipes.get_mut(&recipe.id) {
            Some(existing) => {
                *existing = recipe;
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("Recipe not found: {}", recipe.id)).into()),
        }
    }

    #[instrument(skip(self), fields(recipe_id = %id))]
    async fn delete_recipe(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.remove_recipe(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::fixtures::{recipe, user};
    use crate::domain::repository::UserRepository;

    #[tokio::test]
    async fn test_get_or_create_category_is_unique_by_name() {
        let repo = InMemoryStore::new();
        let first = repo.get_or_create_category("Dessert").await.unwrap();
        let second = repo.get_or_create_category("Dessert").await.unwrap();
        let other = repo.get_or_create_category("Snacks").await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first.id, other.id);
        assert_eq!(repo.list_categories().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_recipe_requires_author() {
        let repo = InMemoryStore::new();
        let r = recipe(Uuid::new_v4(), "Orphan");
        assert!(repo.save_recipe(r).await.is_err());
    }

    #[tokio::test]
    async fn test_list_recipes_filters_by_category_and_author() {
        let repo = InMemoryStore::new();
        let alice = user("alice");
        let bob = user("bob");
        repo.save_user(alice.clone()).await.unwrap();
        repo.save_user(bob.clone()).await.unwrap();
        let dessert = repo.get_or_create_category("Dessert").await.unwrap();

        let mut cake = recipe(alice.id, "Cake");
        cake.category_id = Some(dessert.id);
        let soup = recipe(alice.id, "Soup");
        let mut pie = recipe(bob.id, "Pie");
        pie.category_id = Some(dessert.id);
        for r in [&cake, &soup, &pie] {
            repo.save_recipe(r.clone()).await.unwrap();
        }

        let all = repo.list_recipes(&RecipeFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let desserts = repo
            .list_recipes(&RecipeFilter {
                category: Some("Dessert".to_string()),
                author: None,
            })
            .await
            .unwrap();
        assert_eq!(desserts.len(), 2);

        let alices_desserts = repo
            .list_recipes(&RecipeFilter {
                category: Some("Dessert".to_string()),
                author: Some("alice".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(alices_desserts.len(), 1);
        assert_eq!(alices_desserts[0].title, "Cake");
    }

    #[tokio::test]
    async fn test_update_recipe_missing_is_not_found() {
        let repo = InMemoryStore::new();
        let err = repo
            .update_recipe(recipe(Uuid::new_v4(), "Ghost"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_recipe() {
        let repo = InMemoryStore::new();
        let alice = user("alice");
        repo.save_user(alice.clone()).await.unwrap();
        let r = recipe(alice.id, "Cake");
        repo.save_recipe(r.clone()).await.unwrap();

        assert!(repo.delete_recipe(r.id).await.unwrap());
        assert!(repo.find_recipe(r.id).await.unwrap().is_none());
        assert!(!repo.delete_recipe(r.id).await.unwrap());
    }
}
