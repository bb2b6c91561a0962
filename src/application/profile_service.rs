use crate::domain::error::DomainError;
use crate::domain::repository::ProfileRepository;
use crate::domain::user::Profile;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct ProfileService<R: ProfileRepository> {
    repository: Arc<R>,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile> {
        self.repository
            .find_profile(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Profile not found: {}", user_id)).into())
    }

    #[instrument(skip(self, bio), fields(user_id = %user_id))]
    pub async fn update_bio(&self, user_id: Uuid, bio: String) -> Result<Profile> {
        let mut profile = self.get_profile(user_id).await?;
        profile.bio = bio;
        self.repository.update_profile(profile.clone()).await?;
        info!("Profile bio updated");
        Ok(profile)
    }

    /// `avatar` is an opaque reference into media storage; `None` clears it.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn update_avatar(&self, user_id: Uuid, avatar: Option<String>) -> Result<Profile> {
        if avatar.as_deref().is_some_and(|a| a.trim().is_empty()) {
            return Err(DomainError::Validation("Avatar reference is empty".to_string()).into());
        }
        let mut profile = self.get_profile(user_id).await?;
        profile.avatar = avatar;
        self.repository.update_profile(profile.clone()).await?;
        info!("Profile avatar updated");
        Ok(profile)
    }
}
