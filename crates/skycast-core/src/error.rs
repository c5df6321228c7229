//! Error hierarchy shared by the Skycast crates.
//!
//! Lookup failures reach the UI as plain banner text. These types classify
//! them for the log, and `user_message()` gives a short explanation for the
//! terminal.

use thiserror::Error;

/// A failed weather lookup, classified.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
        }
    }
}

/// Transport-level failures talking to the weather service.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Upstream returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Malformed response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => "Could not reach the weather service.",
            NetworkError::Timeout => "The weather service took too long to answer.",
            NetworkError::ServerError { .. } => "The weather service is having trouble.",
            NetworkError::InvalidResponse(_) => "The weather service sent data Skycast can't read.",
        }
    }
}

/// Problems with the config file.
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
            ConfigError::Invalid(_) => "Some settings in config.toml are invalid.",
            ConfigError::ParseError(_) => "config.toml is not valid TOML.",
        }
    }
}

/// Failures the weather service reported about the lookup itself.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Weather API error: {0}")]
    ApiError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Forecast unavailable: {0}")]
    ForecastUnavailable(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationNotFound(_) => "No place matches that name.",
            WeatherError::ApiError(_) => "The weather service rejected the request.",
            WeatherError::InvalidApiKey => {
                "The API key was rejected. Set weather.api_key or OPENWEATHER_API_KEY."
            }
            WeatherError::ForecastUnavailable(_) => "Forecast unavailable right now.",
        }
    }
}
