pub mod config;
pub mod logging;
pub mod mail;
pub mod scheduler;
pub mod security;
