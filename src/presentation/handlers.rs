use crate::application::auth_service::AuthService;
use crate::application::bookmark_service::BookmarkService;
use crate::application::like_service::LikeService;
use crate::application::profile_service::ProfileService;
use crate::application::recipe_service::RecipeService;
use crate::data::memory::InMemoryStore;
use crate::domain::error::DomainError;
use crate::domain::models::{CreateRecipe, RecipeFilter, UpdateRecipe};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::future::{Ready, ready};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub struct AppState {
    pub recipes: RecipeService<InMemoryStore>,
    pub likes: LikeService<InMemoryStore>,
    pub bookmarks: BookmarkService<InMemoryStore>,
    pub profiles: ProfileService<InMemoryStore>,
    pub auth_service: Arc<AuthService<InMemoryStore>>,
}

impl AppState {
    pub fn new(store: Arc<InMemoryStore>, jwt_secret: String) -> Self {
        Self {
            recipes: RecipeService::new(store.clone()),
            likes: LikeService::new(store.clone()),
            bookmarks: BookmarkService::new(store.clone()),
            profiles: ProfileService::new(store.clone()),
            auth_service: Arc::new(AuthService::new(store, jwt_secret)),
        }
    }
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Storage(msg)
            | ApiError::Internal(msg) => msg.as_str(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        if status.is_server_error() {
            error!(error = %error_msg, status = %status, "Request failed");
        } else {
            warn!(error = %error_msg, status = %status, "Request rejected");
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: error_msg,
            details: serde_json::json!({ "message": self.message() }),
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Conflict(msg)) => ApiError::Conflict(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::Forbidden(msg)) => ApiError::Forbidden(msg.clone()),
            Some(DomainError::Delivery(msg)) | Some(DomainError::Internal(msg)) => {
                ApiError::Internal(msg.clone())
            }
            None => ApiError::Storage(err.to_string()),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(user.ok_or_else(|| ApiError::Unauthorized("User not authenticated".to_string())))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[instrument(skip(state))]
pub async fn list_recipes(
    state: web::Data<AppState>,
    filter: web::Query<RecipeFilter>,
) -> Result<HttpResponse, ApiError> {
    let recipes = state.recipes.list_recipes(filter.into_inner()).await?;
    info!(count = recipes.len(), "Recipes listed");
    Ok(HttpResponse::Ok().json(recipes))
}

#[instrument(skip(state, req), fields(user_id = %user.user_id))]
pub async fn create_recipe(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateRecipe>,
) -> Result<HttpResponse, ApiError> {
    let recipe = state
        .recipes
        .create_recipe(user.user_id, req.into_inner())
        .await?;
    info!(recipe_id = %recipe.recipe.id, "Recipe created");
    Ok(HttpResponse::Created().json(recipe))
}

#[instrument(skip(state), fields(recipe_id = %*path))]
pub async fn get_recipe(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let recipe = state.recipes.get_recipe(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(recipe))
}

#[instrument(skip(state, req), fields(recipe_id = %*path, user_id = %user.user_id))]
pub async fn update_recipe(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateRecipe>,
) -> Result<HttpResponse, ApiError> {
    let recipe = state
        .recipes
        .update_recipe(user.user_id, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(recipe))
}

#[instrument(skip(state), fields(recipe_id = %*path, user_id = %user.user_id))]
pub async fn delete_recipe(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    state
        .recipes
        .delete_recipe(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state))]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let categories = state.recipes.list_categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[instrument(skip(state), fields(recipe_id = %*path, user_id = %user.user_id))]
pub async fn like_recipe(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let like = state
        .likes
        .add_like(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(like))
}

#[instrument(skip(state), fields(recipe_id = %*path, user_id = %user.user_id))]
pub async fn unlike_recipe(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    state
        .likes
        .remove_like(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().finish())
}
