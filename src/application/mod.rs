pub mod auth_service;
pub mod bookmark_service;
pub mod like_service;
pub mod notification;
pub mod profile_service;
pub mod recipe_service;
