//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::model::default_model_path;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Flash cookie signing secret
    pub secret_key: String,

    /// True when SECRET_KEY was not provided
    pub secret_generated: bool,

    /// Classifier artifact location
    pub model_path: PathBuf,

    /// Environment (development, production)
    pub environment: String,

    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let (secret_key, secret_generated) = match env::var("SECRET_KEY") {
            Ok(key) if !key.is_empty() => (key, false),
            // Random per process: flashes don't survive a restart
            _ => (
                format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple()),
                true,
            ),
        };

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            secret_key,
            secret_generated,

            model_path: env::var("MODEL_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_model_path),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global; keep every env-mutating assertion in one test.
    #[test]
    fn test_from_env() {
        env::remove_var("PORT");
        env::remove_var("SECRET_KEY");
        env::remove_var("MODEL_PATH");
        env::remove_var("ENVIRONMENT");
        env::remove_var("LOG_FORMAT");

        let config = Config::from_env();
        assert_eq!(config.port, 5000);
        assert!(config.secret_generated);
        assert_eq!(config.secret_key.len(), 64);
        assert_eq!(config.model_path, default_model_path());
        assert!(!config.is_production());
        assert_eq!(config.log_format, LogFormat::Text);

        // fresh secret per load
        assert_ne!(config.secret_key, Config::from_env().secret_key);

        env::set_var("PORT", "8081");
        env::set_var("SECRET_KEY", "s3cret");
        env::set_var("MODEL_PATH", "/srv/models/account.onnx");
        env::set_var("ENVIRONMENT", "production");
        env::set_var("LOG_FORMAT", "json");

        let config = Config::from_env();
        assert_eq!(config.port, 8081);
        assert_eq!(config.secret_key, "s3cret");
        assert!(!config.secret_generated);
        assert_eq!(config.model_path, PathBuf::from("/srv/models/account.onnx"));
        assert!(config.is_production());
        assert_eq!(config.log_format, LogFormat::Json);

        env::set_var("PORT", "not-a-port");
        assert_eq!(Config::from_env().port, 5000);

        for key in ["PORT", "SECRET_KEY", "MODEL_PATH", "ENVIRONMENT", "LOG_FORMAT"] {
            env::remove_var(key);
        }
    }
}
