//! Weather backend: async conditions and forecast fetching.
//! All network work runs off the UI thread; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use skycast_weather::{ConditionsResult, Coordinates, ForecastEntry, UnitSystem, WeatherProvider};
use tokio::runtime::Handle;

use crate::state::{BannerId, RequestId};

/// Banner text when the service failed without saying why.
pub const FALLBACK_MESSAGE: &str = "An error occurred";

/// Error type for weather operations
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// The service answered with an error status, optionally with its own message
    Remote { status: u16, message: Option<String> },
    /// No response within the configured request timeout
    Timeout,
    Network(String),
    Parse(String),
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Remote {
                status,
                message: Some(m),
            } => write!(f, "Weather error ({}): {}", status, m),
            WeatherError::Remote { status, .. } => write!(f, "Weather error ({})", status),
            WeatherError::Timeout => write!(f, "Request timed out"),
            WeatherError::Network(s) => write!(f, "Network error: {}", s),
            WeatherError::Parse(s) => write!(f, "Unexpected response: {}", s),
        }
    }
}

impl std::error::Error for WeatherError {}

impl WeatherError {
    /// Text for the error banner: the service's own message when it sent one.
    pub fn banner_message(&self) -> String {
        match self {
            WeatherError::Remote {
                message: Some(m), ..
            } => m.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl From<skycast_weather::WeatherError> for WeatherError {
    fn from(e: skycast_weather::WeatherError) -> Self {
        match e {
            skycast_weather::WeatherError::Api { status, message } => {
                WeatherError::Remote { status, message }
            }
            skycast_weather::WeatherError::Network(e) if e.is_timeout() => WeatherError::Timeout,
            skycast_weather::WeatherError::Network(e) => WeatherError::Network(e.to_string()),
            skycast_weather::WeatherError::Parse(s) => WeatherError::Parse(s),
            skycast_weather::WeatherError::InvalidEndpoint(e) => {
                WeatherError::Parse(e.to_string())
            }
        }
    }
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum WeatherServiceMessage {
    ConditionsDone {
        request: RequestId,
        result: Result<ConditionsResult, WeatherError>,
    },
    ForecastDone {
        request: RequestId,
        result: Result<Vec<ForecastEntry>, WeatherError>,
    },
    /// Auto-dismiss delay for a banner elapsed
    ErrorExpired(BannerId),
}

/// Fetch current conditions for `location`.
/// Sends `ConditionsDone` on the channel when complete.
pub fn request_conditions(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &Handle,
    provider: Arc<WeatherProvider>,
    request: RequestId,
    location: String,
    units: UnitSystem,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = provider
            .fetch_conditions(&location, units)
            .await
            .map_err(WeatherError::from);
        let _ = tx.send(WeatherServiceMessage::ConditionsDone { request, result });
    });
}

/// Fetch the forecast for the coordinates of a conditions result.
/// Sends `ForecastDone` on the channel when complete.
pub fn request_forecast(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &Handle,
    provider: Arc<WeatherProvider>,
    request: RequestId,
    coord: Coordinates,
    units: UnitSystem,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = provider
            .fetch_forecast(coord, units)
            .await
            .map_err(WeatherError::from);
        let _ = tx.send(WeatherServiceMessage::ForecastDone { request, result });
    });
}
