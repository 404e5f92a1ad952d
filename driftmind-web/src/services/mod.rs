pub mod api_client;
pub mod download_gateway;
pub mod metrics;
