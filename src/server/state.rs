use std::sync::Arc;
use std::time::Instant;

use crate::storage::Database;

/// Shared handler state. Cloned per request; the pool inside is shared.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub service_name: Arc<str>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Database, service_name: &str) -> Self {
        Self {
            db,
            service_name: Arc::from(service_name),
            started_at: Instant::now(),
        }
    }
}
