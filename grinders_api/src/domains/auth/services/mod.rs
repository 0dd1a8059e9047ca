// Auth domain services
pub mod auth_service;
pub mod jwt_service;
pub mod password_service;
pub mod session_cleanup;
pub mod session_service;
pub mod state;

pub use auth_service::*;
pub use jwt_service::*;
pub use password_service::*;
pub use session_cleanup::*;
pub use session_service::*;
pub use state::*;
