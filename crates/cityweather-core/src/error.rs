//! Centralized error types for CityWeather.
//!
//! Domain crates keep their own error enums; the UI layer converts them into
//! [`AppError`] so every failure is logged with the same shape and a short
//! user-facing message.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    /// Returns a short message suitable for display next to a log line.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Parse(_) => "Received data in an unexpected format.",
            AppError::Config(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
        }
    }

    /// True for the two failure kinds a fetch can end in.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            AppError::Network(_) | AppError::Parse(_) | AppError::Weather(_)
        )
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed.",
            NetworkError::InvalidResponse(_) => "Received an unexpected response.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Local key-value state errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read state file: {0}")]
    Read(String),

    #[error("Failed to write state file: {0}")]
    Write(String),

    #[error("State file is corrupted: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Read(_) => "Unable to read saved state.",
            StorageError::Write(_) => "Unable to save state.",
            StorageError::Corrupt(_) => "Saved state was unreadable and has been ignored.",
        }
    }
}

/// Weather service errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Weather API error: {0}")]
    ApiError(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::CityNotFound(_) => "The weather service does not know this city.",
            WeatherError::InvalidApiKey => "Weather API key is invalid. Check settings.",
            WeatherError::ServiceUnavailable => {
                "Weather service unavailable. Please try again later."
            }
            WeatherError::ApiError(_) => "Weather service error.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Network(NetworkError::Timeout),
            AppError::Parse("bad json".into()),
            AppError::Config(ConfigError::Invalid("test".into())),
            AppError::Storage(StorageError::Corrupt("test".into())),
            AppError::Weather(WeatherError::ServiceUnavailable),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {err}");
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = WeatherError::InvalidApiKey.into();
        assert!(matches!(app_err, AppError::Weather(WeatherError::InvalidApiKey)));
        assert!(app_err.is_fetch_failure());
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let outage = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        let rejected = NetworkError::ServerError {
            status: 400,
            message: "bad".into(),
        };
        assert_ne!(outage.user_message(), rejected.user_message());
    }

    #[test]
    fn test_storage_error_is_not_a_fetch_failure() {
        let app_err = AppError::Storage(StorageError::Write("disk full".into()));
        assert!(!app_err.is_fetch_failure());
        assert_eq!(app_err.user_message(), "Unable to save state.");
    }
}
