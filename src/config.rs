use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;

mod cors;
mod server;

pub use cors::{CorsConfig, DEFAULT_CORSFILE};
pub use server::ServerConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid SERVER_PORT".to_string()))?;

        let config_path =
            env::var("CORS_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CORSFILE.to_string());

        let config = Config {
            server: ServerConfig {
                host: server_host,
                port: server_port,
            },
            cors: CorsConfig {
                config_path: config_path.into(),
            },
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::Configuration(
                "SERVER_HOST cannot be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "SERVER_PORT must be greater than 0".to_string(),
            ));
        }

        if self.cors.config_path.as_os_str().is_empty() {
            return Err(AppError::Configuration(
                "CORS_CONFIG_PATH cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
