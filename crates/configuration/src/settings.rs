use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section has sensible defaults, so the service starts with no
/// configuration file at all (the database section then falls back to the
/// `DATABASE_URL` environment variable, or runs in degraded mode without one).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
}

/// Contains parameters for the HTTP listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// The interface to bind (e.g. "0.0.0.0" or "127.0.0.1").
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerSettings {
    /// Resolves the configured host/port pair into a bindable socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ConfigError::ValidationError(format!("'{}' is not a valid bind address", self.host))
        })?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

/// Contains parameters for the PostgreSQL connection pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// The connection URL. When absent, `DATABASE_URL` from the environment is
    /// used; when that is absent too, the service runs without a database.
    pub url: Option<String>,
    /// Upper bound on concurrently open connections.
    pub max_connections: u32,
    /// Connections kept open even when idle.
    pub min_connections: u32,
    /// How long a request may wait for a pooled connection before failing.
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_on_8000() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.database.url, None);
        assert_eq!(settings.database.max_connections, 10);
    }

    #[test]
    fn socket_addr_resolves_valid_hosts() {
        let server = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 9999,
        };
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:9999");
    }

    #[test]
    fn socket_addr_rejects_garbage_hosts() {
        let server = ServerSettings {
            host: "not-an-ip".to_string(),
            port: 80,
        };
        assert!(matches!(
            server.socket_addr(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
