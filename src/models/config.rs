//! Configuration models loaded from external sources.

use serde::Deserialize;

fn default_event_buffer() -> usize {
    64
}

fn default_page_size() -> usize {
    10
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the REST backend.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Origin allowed by CORS, e.g. `http://localhost:4200`.
    pub allowed_origin: String,
    /// Capacity of the change broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the console client.
pub struct ConsoleConfig {
    /// Base URL of the clients API, e.g. `http://localhost:8080/api/v1`.
    pub api_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// JSON file backing the persisted session state.
    pub state_file: String,
}

/// Reads `config/default.yaml`, the optional `config/{APP_ENV}.yaml` profile
/// (defaults to `local`) and `APP_*` environment variables, in that order.
#[cfg(any(feature = "server", feature = "console"))]
pub fn load<T: serde::de::DeserializeOwned>() -> Result<T, ::config::ConfigError> {
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    ::config::Config::builder()
        .add_source(::config::File::with_name("config/default"))
        .add_source(::config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(::config::Environment::with_prefix("APP"))
        .build()?
        .try_deserialize::<T>()
}
