use crate::presentation::auth::{
    change_password, delete_account, login, me, refresh_token, register, update_me,
};
use crate::presentation::handlers::{
    create_recipe, delete_recipe, get_recipe, health_check, like_recipe, list_categories,
    list_recipes, unlike_recipe, update_recipe,
};
use crate::presentation::profile::{
    add_bookmark, get_profile, list_bookmarks, remove_bookmark, update_avatar, update_profile,
};
use actix_web::web;

pub const ROUTES_SUMMARY: &str = "GET /api/health, POST /api/auth/{register,login,token,password}, \
GET|PATCH|DELETE /api/users/me, GET|POST /api/recipes, GET|PATCH|DELETE /api/recipes/{id}, \
POST|DELETE /api/recipes/{id}/like, GET /api/categories, GET|PATCH /api/profile, \
PUT /api/profile/avatar, GET /api/profile/bookmarks, POST|DELETE /api/profile/bookmarks/{recipe_id}";

/// Mounts every endpoint under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .route("/auth/register", web::post().to(register))
            .route("/auth/login", web::post().to(login))
            .route("/auth/token", web::post().to(refresh_token))
            .route("/auth/password", web::post().to(change_password))
            .route("/users/me", web::get().to(me))
            .route("/users/me", web::patch().to(update_me))
            .route("/users/me", web::delete().to(delete_account))
            .route("/recipes", web::get().to(list_recipes))
            .route("/recipes", web::post().to(create_recipe))
            .route("/recipes/{id}", web::get().to(get_recipe))
            .route("/recipes/{id}", web::patch().to(update_recipe))
            .route("/recipes/{id}", web::delete().to(delete_recipe))
            .route("/recipes/{id}/like", web::post().to(like_recipe))
            .route("/recipes/{id}/like", web::delete().to(unlike_recipe))
            .route("/categories", web::get().to(list_categories))
            .route("/profile", web::get().to(get_profile))
            .route("/profile", web::patch().to(update_profile))
            .route("/profile/avatar", web::put().to(update_avatar))
            .route("/profile/bookmarks", web::get().to(list_bookmarks))
            .route("/profile/bookmarks/{id}", web::post().to(add_bookmark))
            .route("/profile/bookmarks/{id}", web::delete().to(remove_bookmark)),
    );
}
