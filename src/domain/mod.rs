pub mod error;
pub mod mail;
pub mod models;
pub mod repository;
pub mod user;
