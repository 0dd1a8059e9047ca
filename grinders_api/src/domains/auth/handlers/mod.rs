// Auth domain handlers
pub mod auth_handler;
