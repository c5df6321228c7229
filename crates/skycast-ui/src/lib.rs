//! Weather widget for Skycast: state snapshot, transitions, rendering and the
//! controller that drives the fetch chain.

pub mod bridge;
pub mod dismiss;
pub mod error_mapping;
pub mod models;
pub mod render;
pub mod services;
pub mod state;

pub use models::WeatherModel;
pub use state::{ForecastState, UiState, UiStatus};
