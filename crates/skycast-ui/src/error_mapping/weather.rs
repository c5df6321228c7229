use crate::services::WeatherError as UiWeatherError;
use skycast_core::{AppError, NetworkError, WeatherError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::Remote { status: 404, message } => AppError::Weather(
                WeatherError::LocationNotFound(message.unwrap_or_default()),
            ),
            UiWeatherError::Remote { status: 401, .. } => {
                AppError::Weather(WeatherError::InvalidApiKey)
            }
            UiWeatherError::Remote { status, message } if status >= 500 => {
                AppError::Network(NetworkError::ServerError {
                    status,
                    message: message.unwrap_or_default(),
                })
            }
            UiWeatherError::Remote { status, message } => AppError::Weather(
                WeatherError::ApiError(message.unwrap_or_else(|| format!("status {}", status))),
            ),
            UiWeatherError::Timeout => AppError::Network(NetworkError::Timeout),
            UiWeatherError::Network(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            UiWeatherError::Parse(s) => AppError::Network(NetworkError::InvalidResponse(s)),
        }
    }
}

/// A failed forecast never raises the banner; it is logged as this instead.
pub fn forecast_unavailable(e: &UiWeatherError) -> AppError {
    AppError::Weather(WeatherError::ForecastUnavailable(e.to_string()))
}
