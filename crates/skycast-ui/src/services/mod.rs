pub mod weather_service;

pub use weather_service::{
    request_conditions, request_forecast, WeatherError, WeatherServiceMessage, FALLBACK_MESSAGE,
};
