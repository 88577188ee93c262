// Library root for the character API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use error::ApiError;
pub use models::User;
pub use routes::create_router;
pub use state::AppState;
