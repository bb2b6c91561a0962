use crate::domain::user::{ChangePassword, CreateUser, LoginRequest, UpdateUser};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .auth_service
        .register_user(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!(user_id = %user.id, "User registered successfully");
    Ok(HttpResponse::Created().json(RegisterResponse {
        id: user.id,
        email: user.email,
        username: user.username,
    }))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let access_token = state.auth_service.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { access_token }))
}

/// Issues a fresh token for the caller.
#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn refresh_token(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let access_token = state.auth_service.get_token(user.user_id).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { access_token }))
}

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user = state.auth_service.get_user(user.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[instrument(skip(state, req), fields(user_id = %user.user_id))]
pub async fn update_me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateUser>,
) -> Result<HttpResponse, ApiError> {
    let updated = state
        .auth_service
        .update_user(user.user_id, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[instrument(skip(state, req), fields(user_id = %user.user_id))]
pub async fn change_password(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ChangePassword>,
) -> Result<HttpResponse, ApiError> {
    state
        .auth_service
        .change_password(user.user_id, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().finish())
}

#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_account(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    state.auth_service.delete_account(user.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
