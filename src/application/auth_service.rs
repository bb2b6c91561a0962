use crate::domain::error::DomainError;
use crate::domain::repository::{ProfileRepository, UserRepository};
use crate::domain::user::{ChangePassword, CreateUser, LoginRequest, Profile, UpdateUser, User};
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

pub struct AuthService<R: UserRepository + ProfileRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
}

impl<R: UserRepository + ProfileRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            jwt_secret,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Creates the user and its empty profile.
    #[instrument(skip(self, req), fields(email = %req.email, username = %req.username))]
    pub async fn register_user(&self, req: CreateUser) -> Result<User> {
        trace!("Starting user registration");

        let email = req.email.trim().to_string();
        let username = req.username.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("A valid email is required".to_string()).into());
        }
        if username.is_empty() {
            return Err(DomainError::Validation("Username is required".to_string()).into());
        }
        if req.password.is_empty() {
            return Err(DomainError::Validation("Password is required".to_string()).into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let user = User {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
        };

        // Uniqueness of email and username is enforced by the store.
        self.user_repository.save_user(user.clone()).await?;
        debug!(user_id = %user.id, "Creating profile for new user");
        self.user_repository
            .save_profile(Profile::new(user.id))
            .await?;

        info!(
            user_id = %user.id,
            email = %user.email,
            "User registered successfully"
        );
        Ok(user)
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<String> {
        let user = self.authenticate(&req.email, &req.password).await?;

        let token = generate_token(user.id, &self.jwt_secret).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(user_id = %user.id, "Login successful");
        Ok(token)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_token(&self, user_id: Uuid) -> Result<String> {
        let user = self.get_user(user_id).await?;

        let token = generate_token(user.id, &self.jwt_secret).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(user_id = %user.id, "Token generated successfully");
        Ok(token)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "User not found");
                DomainError::NotFound(format!("User not found: {}", user_id)).into()
            })
    }

    #[instrument(skip(self, req), fields(user_id = %user_id))]
    pub async fn update_user(&self, user_id: Uuid, req: UpdateUser) -> Result<User> {
        let mut user = self.get_user(user_id).await?;

        if let Some(email) = req.email {
            let email = email.trim().to_string();
            if email.is_empty() || !email.contains('@') {
                return Err(DomainError::Validation("A valid email is required".to_string()).into());
            }
            user.email = email;
        }
        if let Some(username) = req.username {
            let username = username.trim().to_string();
            if username.is_empty() {
                return Err(DomainError::Validation("Username is required".to_string()).into());
            }
            user.username = username;
        }

        // The store rejects an email or username held by someone else.
        self.user_repository.update_user(user.clone()).await?;
        info!(email = %user.email, username = %user.username, "User details updated");
        Ok(user)
    }

    #[instrument(skip(self, req), fields(user_id = %user_id))]
    pub async fn change_password(&self, user_id: Uuid, req: ChangePassword) -> Result<()> {
        let mut user = self.get_user(user_id).await?;

        let is_valid = verify_password(&req.old_password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;
        if !is_valid {
            warn!("Old password does not match");
            return Err(DomainError::Validation("Old password is not correct".to_string()).into());
        }
        if req.new_password.is_empty() {
            return Err(DomainError::Validation("Password is required".to_string()).into());
        }

        user.password_hash = hash_password(&req.new_password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;
        self.user_repository.update_user(user).await?;

        info!("Password changed");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn delete_account(&self, user_id: Uuid) -> Result<()> {
        if !self.user_repository.delete_user(user_id).await? {
            return Err(DomainError::NotFound(format!("User not found: {}", user_id)).into());
        }
        info!("Account deleted");
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .user_repository
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| {
                warn!(email = email, "User not found during login");
                DomainError::Unauthorized("Invalid email or password".to_string())
            })?;

        let is_valid = verify_password(password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;
        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::Unauthorized("Invalid email or password".to_string()).into());
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::infrastructure::security::validate_token;

    fn service() -> AuthService<InMemoryStore> {
        AuthService::new(Arc::new(InMemoryStore::new()), "test-secret".to_string())
    }

    fn create_user(email: &str, username: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            username: username.to_string(),
            password: "testpass".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_user_and_profile() {
        let store = Arc::new(InMemoryStore::new());
        let auth = AuthService::new(store.clone(), "test-secret".to_string());

        let user = auth
            .register_user(create_user("testuser@example.com", "testuser"))
            .await
            .unwrap();

        assert_eq!(user.email, "testuser@example.com");
        assert_ne!(user.password_hash, "testpass");
        let profile = store.find_profile(user.id).await.unwrap().unwrap();
        assert!(profile.bookmarks.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_blank_fields() {
        let auth = service();
        auth.register_user(create_user("a@example.com", "alice"))
            .await
            .unwrap();

        let dup = auth
            .register_user(create_user("a@example.com", "other"))
            .await
            .unwrap_err();
        assert!(matches!(
            dup.downcast_ref::<DomainError>(),
            Some(DomainError::Conflict(_))
        ));

        let blank = auth
            .register_user(create_user("b@example.com", "  "))
            .await
            .unwrap_err();
        assert!(matches!(
            blank.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_returns_token_for_user() {
        let auth = service();
        let user = auth
            .register_user(create_user("login@example.com", "login"))
            .await
            .unwrap();

        let token = auth
            .login(LoginRequest {
                email: "login@example.com".to_string(),
                password: "testpass".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(validate_token(&token, "test-secret").unwrap(), user.id);

        let err = auth
            .login(LoginRequest {
                email: "login@example.com".to_string(),
                password: "wrongpassword".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_update_user_details() {
        let auth = service();
        auth.register_user(create_user("taken@example.com", "taken"))
            .await
            .unwrap();
        let user = auth
            .register_user(create_user("me@example.com", "me"))
            .await
            .unwrap();

        let updated = auth
            .update_user(
                user.id,
                UpdateUser {
                    username: Some("updateduser".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "updateduser");
        assert_eq!(updated.email, "me@example.com");
        assert_eq!(updated.password_hash, user.password_hash);

        let err = auth
            .update_user(
                user.id,
                UpdateUser {
                    username: Some("taken".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Conflict(_))
        ));

        let err = auth
            .update_user(
                user.id,
                UpdateUser {
                    email: Some("nope".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));
        assert_eq!(auth.get_user(user.id).await.unwrap().username, "updateduser");
    }

    #[tokio::test]
    async fn test_change_password() {
        let auth = service();
        let user = auth
            .register_user(create_user("pw@example.com", "pw"))
            .await
            .unwrap();

        let wrong = auth
            .change_password(
                user.id,
                ChangePassword {
                    old_password: "wrongpassword".to_string(),
                    new_password: "newpassword123".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            wrong.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));

        auth.change_password(
            user.id,
            ChangePassword {
                old_password: "testpass".to_string(),
                new_password: "newpassword123".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(
            auth.login(LoginRequest {
                email: "pw@example.com".to_string(),
                password: "newpassword123".to_string(),
            })
            .await
            .is_ok()
        );
    }

    #[tokio::test]
    async fn test_delete_account() {
        let auth = service();
        let user = auth
            .register_user(create_user("gone@example.com", "gone"))
            .await
            .unwrap();

        auth.delete_account(user.id).await.unwrap();
        assert!(auth.get_user(user.id).await.is_err());
        assert!(auth.delete_account(user.id).await.is_err());
    }
}
