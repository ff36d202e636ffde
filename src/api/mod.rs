pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::gateway::PersonSearchService;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PersonSearchService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<PersonSearchService>) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}
