use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, ServerSettings, Settings};

/// Loads the application configuration.
///
/// This function is the primary entry point for this crate. It reads the
/// optional `config.toml` file, layers `APP_`-prefixed environment variables
/// on top (e.g. `APP_SERVER__PORT=9000`), and deserializes the result into
/// our strongly-typed `Settings` struct.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        // The file is optional so the service can run from environment alone.
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn parses_a_full_toml_document() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9001

            [database]
            url = "postgres://localhost/fibonacci"
            max_connections = 4
            min_connections = 2
            acquire_timeout_secs = 3
        "#;
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9001);
        assert_eq!(
            settings.database.url.as_deref(),
            Some("postgres://localhost/fibonacci")
        );
        assert_eq!(settings.database.max_connections, 4);
        assert_eq!(settings.database.min_connections, 2);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str("[server]\nport = 8080", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert!(settings.database.url.is_none());
    }
}
