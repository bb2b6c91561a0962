use crate::data::memory::InMemoryStore;
use crate::domain::error::DomainError;
use crate::domain::repository::{ProfileRepository, UserRepository};
use crate::domain::user::{Profile, User};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

#[async_trait]
impl UserRepository for InMemoryStore {
    #[instrument(skip(self), fields(user_id = %user.id, email = %user.email))]
    async fn save_user(&self, user: User) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut tables = self.tables.write().await;
        if let Some(field) = tables.unique_field_taken(&user) {
            warn!(field = field, "Unique constraint violated on user");
            return Err(
                DomainError::Conflict(format!("User with this {} already exists", field)).into(),
            );
        }
        tables.users.insert(user.id, user.clone());
        debug!(
            user_id = %user.id,
            email = %user.email,
            "User saved to memory storage"
        );
        Ok(())
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        let user = tables.users.values().find(|u| u.email == email).cloned();
        if user.is_none() {
            trace!(email = email, "User not found in storage");
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(username = username))]
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        let user = tables.users.get(&id).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, email = %u.email, "User found in storage"),
            None => trace!(user_id = %id, "User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %user.id))]
    async fn update_user(&self, user: User) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(DomainError::NotFound(format!("User not found: {}", user.id)).into());
        }
        if let Some(field) = tables.unique_field_taken(&user) {
            warn!(field = field, "Unique constraint violated on user update");
            return Err(
                DomainError::Conflict(format!("User with this {} already exists", field)).into(),
            );
        }
        tables.users.insert(user.id, user);
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.remove_user(id);
        debug!(removed = removed, "User delete finished");
        Ok(removed)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    #[instrument(skip(self, profile), fields(user_id = %profile.user_id))]
    async fn save_profile(&self, profile: Profile) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.profiles.contains_key(&profile.user_id) {
            return Err(DomainError::Conflict(format!(
                "Profile already exists for user {}",
                profile.user_id
            ))
            .into());
        }
        tables.profiles.insert(profile.user_id, profile);
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.get(&user_id).cloned())
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.user_id))]
    async fn update_profile(&self, profile: Profile) -> Result<()> {
        let mut tables = self.tables.write().await;
        let existing = tables.profiles.get_mut(&profile.user_id).ok_or_else(|| {
            DomainError::NotFound(format!("Profile not found: {}", profile.user_id))
        })?;
        // Bookmarks are owned by the bookmark operations; keep the stored set.
        existing.bio = profile.bio;
        existing.avatar = profile.avatar;
        Ok(())
    }
}
