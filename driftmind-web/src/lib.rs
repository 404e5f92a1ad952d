pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use config::{Settings, TransportMode};
use services::{api_client::DriftMindClient, download_gateway::DownloadGateway};
use std::sync::Arc;

/// Shared application state, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub api_client: Arc<DriftMindClient>,
    pub downloads: DownloadGateway,
    pub transport: TransportMode,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let api_client = Arc::new(DriftMindClient::new(settings.driftmind_api.clone()));
        let downloads = DownloadGateway::new(api_client.clone());
        let transport = settings.realtime.transport_mode();

        Self {
            settings: Arc::new(settings),
            api_client,
            downloads,
            transport,
        }
    }
}
