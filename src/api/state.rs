use std::sync::Arc;

use crate::service::StatsService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StatsService>,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(service: StatsService, cors_origin: &str) -> Self {
        Self {
            service: Arc::new(service),
            cors_origin: cors_origin.to_string(),
        }
    }
}
