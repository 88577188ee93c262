use std::sync::Arc;

use crate::db::Database;

/// Shared handler state: the connection pool plus the greeting served on `/`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub greeting: Arc<str>,
}

impl AppState {
    pub fn new(db: Database, greeting: impl Into<String>) -> Self {
        AppState {
            db: Arc::new(db),
            greeting: Arc::from(greeting.into()),
        }
    }
}
