use precis_client::ClientConfig;
use precis_core::AppError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Server settings: listener, inbound limits, and the outbound client configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Ceiling on inbound request bodies.
    pub max_body_bytes: usize,
    pub client: ClientConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("PRECIS_SERVER_PORT").filter(|v| !v.trim().is_empty()) {
            Some(v) => v.trim().parse().map_err(|_| {
                AppError::ConfigError(format!("Invalid value for PRECIS_SERVER_PORT: {v:?}"))
            })?,
            None => DEFAULT_PORT,
        };

        let max_body_bytes = match lookup("PRECIS_MAX_BODY_BYTES").filter(|v| !v.trim().is_empty())
        {
            Some(v) => v.trim().parse().map_err(|_| {
                AppError::ConfigError(format!("Invalid value for PRECIS_MAX_BODY_BYTES: {v:?}"))
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            port,
            max_body_bytes,
            client: ClientConfig::from_lookup(lookup)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
