//! Weather data for Skycast
//!
//! Builds OpenWeatherMap request URLs and fetches current conditions and
//! the multi-point forecast for a location.

pub mod provider;
pub mod query;
pub mod types;

pub use provider::{ProviderSettings, WeatherProvider};
pub use query::QueryBuilder;
pub use types::*;
