// Standard library imports
use std::env;

// Third party imports
use anyhow::Result;
use dotenv::dotenv;
use serde::{Deserialize, Serialize};

/// Cấu hình service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host API
    pub api_host: String,
    /// Port API
    pub api_port: u16,
    /// Mức log mặc định
    pub log_level: String,
}

impl Config {
    /// Cấu hình mặc định
    pub fn new() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            log_level: "info".to_string(),
        }
    }

    /// Đọc cấu hình từ biến môi trường
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Module tests
#[cfg(test)]
mod tests {
    use super::*;

    /// Test cấu hình mặc định
    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(config.api_host, "0.0.0.0");
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.log_level, "info");
    }
}
