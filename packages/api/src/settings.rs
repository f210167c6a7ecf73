use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
    /// Base URL of the backend service, e.g. `http://localhost:5000`.
    pub url: String,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// Relay server settings.
///
/// Sources, later wins: built-in defaults, optional `config.toml`, then
/// environment variables with `__` between sections (`BACKEND__URL`, `SERVER__PORT`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub backend: Backend,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let config = Config::builder()
            .set_default("backend.url", defaults.backend.url)?
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
