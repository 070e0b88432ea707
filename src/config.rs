//! Application configuration module
//! Handles environment variable loading, configuration validation, and application settings

use std::env;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub bakong: BakongConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log format options
#[derive(Debug, Clone)]
pub enum LogFormat {
    Json,
    Plain,
}

/// Bakong open API configuration
///
/// `base_url` and `email` drive the token renewal flow; the merchant fields
/// are stamped into every generated KHQR payload.
#[derive(Debug, Clone)]
pub struct BakongConfig {
    pub base_url: String,
    pub email: String,
    pub account_id: String,
    pub merchant_id: String,
    pub acquiring_bank: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub mobile_number: String,
    pub store_label: String,
    pub request_timeout: u64, // seconds
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenv::dotenv().ok();

        Ok(AppConfig {
            server: ServerConfig::from_env()?,
            bakong: BakongConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.bakong.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue(
                "SERVER_PORT cannot be 0".to_string(),
            ));
        }

        if self.host.is_empty() {
            return Err(ConfigError::InvalidValue(
                "SERVER_HOST cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl BakongConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(BakongConfig {
            base_url: env::var("BAKONG_BASE_URL")
                .map_err(|_| ConfigError::MissingVariable("BAKONG_BASE_URL".to_string()))?,
            email: env::var("BAKONG_EMAIL")
                .map_err(|_| ConfigError::MissingVariable("BAKONG_EMAIL".to_string()))?,
            account_id: env::var("BAKONG_ACCOUNT_ID")
                .map_err(|_| ConfigError::MissingVariable("BAKONG_ACCOUNT_ID".to_string()))?,
            merchant_id: env::var("BAKONG_MERCHANT_ID")
                .map_err(|_| ConfigError::MissingVariable("BAKONG_MERCHANT_ID".to_string()))?,
            acquiring_bank: env::var("BAKONG_ACQUIRING_BANK")
                .map_err(|_| ConfigError::MissingVariable("BAKONG_ACQUIRING_BANK".to_string()))?,
            merchant_name: env::var("BAKONG_MERCHANT_NAME")
                .map_err(|_| ConfigError::MissingVariable("BAKONG_MERCHANT_NAME".to_string()))?,
            merchant_city: env::var("BAKONG_MERCHANT_CITY")
                .unwrap_or_else(|_| "PHNOM PENH".to_string()),
            mobile_number: env::var("BAKONG_MOBILE_NUMBER").unwrap_or_default(),
            store_label: env::var("BAKONG_STORE_LABEL").unwrap_or_default(),
            request_timeout: env::var("BAKONG_REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BAKONG_REQUEST_TIMEOUT".to_string()))?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "BAKONG_BASE_URL must be a valid URL".to_string(),
            ));
        }

        if !self.email.contains('@') {
            return Err(ConfigError::InvalidValue(
                "BAKONG_EMAIL must be a valid email address".to_string(),
            ));
        }

        // KHQR caps the Bakong account id at 32 characters
        if self.account_id.is_empty() || self.account_id.len() > 32 {
            return Err(ConfigError::InvalidValue(
                "BAKONG_ACCOUNT_ID must be 1-32 characters".to_string(),
            ));
        }

        if self.merchant_name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "BAKONG_MERCHANT_NAME cannot be empty".to_string(),
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidValue(
                "BAKONG_REQUEST_TIMEOUT".to_string(),
            ));
        }

        Ok(())
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "plain".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Plain,
            },
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
        if !valid_levels.contains(&self.level.to_uppercase().as_str()) {
            return Err(ConfigError::InvalidValue("LOG_LEVEL".to_string()));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),

    #[error("Invalid value for configuration: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bakong_config() -> BakongConfig {
        BakongConfig {
            base_url: "https://api-bakong.nbc.gov.kh".to_string(),
            email: "merchant@example.com".to_string(),
            account_id: "merchant@bank".to_string(),
            merchant_id: "123456".to_string(),
            acquiring_bank: "Dev Bank".to_string(),
            merchant_name: "Coffee Shop".to_string(),
            merchant_city: "PHNOM PENH".to_string(),
            mobile_number: "85512345678".to_string(),
            store_label: "Shop 1".to_string(),
            request_timeout: 30,
        }
    }

    #[test]
    fn test_server_config_validation() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port_validation() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Invalid port
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bakong_config_validation() {
        assert!(bakong_config().validate().is_ok());
    }

    #[test]
    fn test_bakong_config_rejects_bad_url() {
        let config = BakongConfig {
            base_url: "not-a-url".to_string(),
            ..bakong_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bakong_config_rejects_bad_email() {
        let config = BakongConfig {
            email: "not-an-email".to_string(),
            ..bakong_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bakong_config_rejects_zero_timeout() {
        let config = BakongConfig {
            request_timeout: 0,
            ..bakong_config()
        };

        assert!(config.validate().is_err());
    }
}
