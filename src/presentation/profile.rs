use crate::domain::models::Recipe;
use crate::domain::user::{UpdateAvatar, UpdateProfile};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Serialize)]
pub struct BookmarksResponse {
    pub bookmarks: Vec<Recipe>,
}

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state.profiles.get_profile(user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(state, req), fields(user_id = %user.user_id))]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateProfile>,
) -> Result<HttpResponse, ApiError> {
    let profile = state
        .profiles
        .update_bio(user.user_id, req.into_inner().bio)
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(state, req), fields(user_id = %user.user_id))]
pub async fn update_avatar(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateAvatar>,
) -> Result<HttpResponse, ApiError> {
    let profile = state
        .profiles
        .update_avatar(user.user_id, req.into_inner().avatar)
        .await?;
    info!(has_avatar = profile.avatar.is_some(), "Avatar updated");
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_bookmarks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let bookmarks = state.bookmarks.list_bookmarks(user.user_id).await?;
    Ok(HttpResponse::Ok().json(BookmarksResponse { bookmarks }))
}

#[instrument(skip(state), fields(user_id = %user.user_id, recipe_id = %*path))]
pub async fn add_bookmark(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    state
        .bookmarks
        .add_bookmark(user.user_id, path.into_inner())
        .await?;
    let bookmarks = state.bookmarks.list_bookmarks(user.user_id).await?;
    Ok(HttpResponse::Ok().json(BookmarksResponse { bookmarks }))
}

#[instrument(skip(state), fields(user_id = %user.user_id, recipe_id = %*path))]
pub async fn remove_bookmark(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    state
        .bookmarks
        .remove_bookmark(user.user_id, path.into_inner())
        .await?;
    let bookmarks = state.bookmarks.list_bookmarks(user.user_id).await?;
    Ok(HttpResponse::Ok().json(BookmarksResponse { bookmarks }))
}
