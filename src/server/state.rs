use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use crate::gear_store::GearStore;
use crate::matching::{MatchPreviewService, Registries};

use super::ServerConfig;

pub type GuardedGearStore = Arc<dyn GearStore>;
pub type GuardedMatchPreviewService = Arc<MatchPreviewService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub gear_store: GuardedGearStore,
    pub match_service: GuardedMatchPreviewService,
}

impl ServerState {
    pub fn new(config: ServerConfig, gear_store: GuardedGearStore, registries: Registries) -> Self {
        let match_service = Arc::new(MatchPreviewService::new(
            gear_store.clone(),
            Arc::new(registries),
        ));
        ServerState {
            config,
            start_time: Instant::now(),
            gear_store,
            match_service,
        }
    }
}

impl FromRef<ServerState> for GuardedGearStore {
    fn from_ref(input: &ServerState) -> Self {
        input.gear_store.clone()
    }
}

impl FromRef<ServerState> for GuardedMatchPreviewService {
    fn from_ref(input: &ServerState) -> Self {
        input.match_service.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
