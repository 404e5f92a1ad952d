use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub driftmind_api: DriftMindApiSettings,
    #[serde(default)]
    pub realtime: RealtimeSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Body limit for the upload endpoints, in megabytes.
    #[serde(default = "default_max_upload_size_mb")]
    pub max_upload_size_mb: usize,
}

fn default_max_upload_size_mb() -> usize {
    3
}

impl ServerSettings {
    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Deserialize, Clone)]
pub struct DriftMindApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub endpoints: EndpointSettings,
}

fn default_base_url() -> String {
    "http://localhost:5175".to_string()
}

/// Path overrides for the upstream DriftMind API, appended to `base_url`.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct EndpointSettings {
    pub upload: String,
    pub search: String,
    pub documents: String,
    pub download_token: String,
    pub download_file: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            upload: "/uploads".to_string(),
            search: "/search".to_string(),
            documents: "/documents".to_string(),
            download_token: "/download/token".to_string(),
            download_file: "/download/file".to_string(),
        }
    }
}

/// Raw realtime transport options, see [`TransportMode`] for the resolved form.
#[derive(Deserialize, Clone)]
pub struct RealtimeSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub connection_string: Option<Secret<String>>,
    #[serde(default = "default_application_name")]
    pub application_name: String,
}

fn default_application_name() -> String {
    "DriftMindWeb".to_string()
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            connection_string: None,
            application_name: default_application_name(),
        }
    }
}

/// Realtime transport, resolved once at startup.
#[derive(Clone)]
pub enum TransportMode {
    Local,
    Managed {
        connection_string: Secret<String>,
        application_name: String,
    },
}

impl RealtimeSettings {
    /// Managed transport requires both the flag and a non-blank connection string.
    pub fn transport_mode(&self) -> TransportMode {
        match &self.connection_string {
            Some(connection_string)
                if self.enabled && !connection_string.expose_secret().trim().is_empty() =>
            {
                TransportMode::Managed {
                    connection_string: connection_string.clone(),
                    application_name: self.application_name.clone(),
                }
            }
            _ => TransportMode::Local,
        }
    }
}

impl TransportMode {
    pub fn is_managed(&self) -> bool {
        matches!(self, TransportMode::Managed { .. })
    }

    pub fn description(&self) -> &'static str {
        match self {
            TransportMode::Local => "Local (in-process)",
            TransportMode::Managed { .. } => "Managed realtime service",
        }
    }
}

impl std::fmt::Debug for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportMode::Local => f.write_str("Local"),
            TransportMode::Managed {
                application_name, ..
            } => f
                .debug_struct("Managed")
                .field("application_name", application_name)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP/gRPC collector, e.g. `http://tempo:4317`. No export when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    service_core::config::load_configuration("driftmind-web")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn realtime(enabled: bool, connection_string: Option<&str>) -> RealtimeSettings {
        RealtimeSettings {
            enabled,
            connection_string: connection_string.map(|s| Secret::new(s.to_string())),
            application_name: "DriftMindWeb".to_string(),
        }
    }

    #[test]
    fn disabled_realtime_is_local() {
        let mode = realtime(false, Some("Endpoint=https://x;AccessKey=y")).transport_mode();
        assert!(!mode.is_managed());
    }

    #[test]
    fn enabled_without_connection_string_is_local() {
        assert!(!realtime(true, None).transport_mode().is_managed());
        assert!(!realtime(true, Some("   ")).transport_mode().is_managed());
    }

    #[test]
    fn enabled_with_connection_string_is_managed() {
        match realtime(true, Some("Endpoint=https://x;AccessKey=y")).transport_mode() {
            TransportMode::Managed {
                application_name, ..
            } => assert_eq!(application_name, "DriftMindWeb"),
            TransportMode::Local => panic!("expected managed transport"),
        }
    }

    #[test]
    fn debug_output_hides_connection_string() {
        let mode = realtime(true, Some("AccessKey=topsecret")).transport_mode();
        assert!(!format!("{:?}", mode).contains("topsecret"));
    }

    #[test]
    fn endpoint_defaults_match_upstream_routes() {
        let endpoints = EndpointSettings::default();
        assert_eq!(endpoints.download_token, "/download/token");
        assert_eq!(endpoints.download_file, "/download/file");
        assert_eq!(endpoints.documents, "/documents");
    }

    #[test]
    fn upload_limit_is_in_megabytes() {
        let server = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_size_mb: 3,
        };
        assert_eq!(server.max_upload_size_bytes(), 3 * 1024 * 1024);
    }

    #[test]
    fn oversized_upload_limit_saturates() {
        let server = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_size_mb: usize::MAX,
        };
        assert_eq!(server.max_upload_size_bytes(), usize::MAX);
    }
}
