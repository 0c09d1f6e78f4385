use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::pipeline::MatchPipeline;
use crate::wizard::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: MatchPipeline,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Arc<Config>, pipeline: MatchPipeline) -> Self {
        let sessions = SessionStore::new(
            config.session_capacity,
            Duration::from_secs(config.session_ttl_seconds),
        );
        AppState {
            config,
            pipeline,
            sessions,
        }
    }
}
