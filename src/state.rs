use std::sync::Arc;

use crate::ads::AdConfig;
use crate::config::Config;
use crate::lookup::SummonerLookup;

/// Shared per-process state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub lookup: Arc<dyn SummonerLookup>,
}

impl AppState {
    pub fn new(config: Config, lookup: Arc<dyn SummonerLookup>) -> Self {
        Self {
            config: Arc::new(config),
            lookup,
        }
    }

    pub fn ad_config(&self) -> AdConfig {
        AdConfig::horizontal_mobile(self.config.production)
    }
}
