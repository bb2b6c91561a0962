pub mod bookmark_repository;
pub mod like_repository;
pub mod memory;
pub mod recipe_repository;
pub mod user_repository;
