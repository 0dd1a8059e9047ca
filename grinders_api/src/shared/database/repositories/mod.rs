// All repositories module
pub mod auth;

// Re-export all repositories for convenience
pub use auth::*;
