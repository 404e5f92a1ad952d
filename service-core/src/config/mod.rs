use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Resolve the `config/` directory of a service.
///
/// Works both when the binary is started from the workspace root and from
/// inside the service directory itself.
pub fn configuration_directory(service_dir: &str) -> Result<PathBuf, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;

    if base_path.ends_with(service_dir) {
        Ok(base_path.join("config"))
    } else {
        Ok(base_path.join(service_dir).join("config"))
    }
}

/// Load layered settings for a service.
///
/// Sources, later ones win: `config/base.yaml` (required), `config/local.yaml`
/// (optional), then `APP_` environment variables using `__` as the nesting
/// separator, e.g. `APP_SERVER__PORT=8080`.
pub fn load_configuration<T: DeserializeOwned>(service_dir: &str) -> Result<T, ConfigError> {
    let configuration_directory = configuration_directory(service_dir)?;

    Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(File::from(configuration_directory.join("local.yaml")).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize::<T>()
}
