use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::{Context, Result};
use skycast_core::Config;
use skycast_weather::{ProviderSettings, WeatherProvider};

use crate::models::WeatherModel;

// Static tokio runtime that lives for the duration of the application
static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

/// Get the shared runtime handle, creating the runtime on first use
pub fn get_or_init_runtime() -> Result<tokio::runtime::Handle> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime.handle().clone());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("skycast-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    // Losing a race here just drops our runtime; the winner's is used
    let _ = RUNTIME.set(runtime);

    RUNTIME
        .get()
        .map(|r| r.handle().clone())
        .context("Tokio runtime unavailable")
}

/// Convert the configured unit preference to the provider's unit type
pub fn unit_system_from_config(unit: skycast_core::UnitSystem) -> skycast_weather::UnitSystem {
    match unit {
        skycast_core::UnitSystem::Metric => skycast_weather::UnitSystem::Metric,
        skycast_core::UnitSystem::Imperial => skycast_weather::UnitSystem::Imperial,
    }
}

pub fn provider_settings(config: &Config) -> ProviderSettings {
    ProviderSettings {
        api_key: config.weather.api_key.clone(),
        api_base_url: config.weather.api_base_url.clone(),
        icon_base_url: config.weather.icon_base_url.clone(),
        timeout: Duration::from_secs(config.weather.request_timeout_secs),
    }
}

/// Build a WeatherModel wired to the shared runtime from a loaded config
pub fn initialize_weather_model(config: &Config) -> Result<WeatherModel> {
    let runtime = get_or_init_runtime()?;

    let provider = WeatherProvider::new(provider_settings(config))
        .context("Failed to create WeatherProvider")?;

    tracing::info!(
        "Weather services initialized ({} units)",
        unit_system_from_config(config.weather.units)
    );

    Ok(WeatherModel::new(
        Arc::new(provider),
        runtime,
        unit_system_from_config(config.weather.units),
        Duration::from_millis(config.ui.error_dismiss_ms),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_units() {
        assert_eq!(
            unit_system_from_config(skycast_core::UnitSystem::Imperial),
            skycast_weather::UnitSystem::Imperial
        );
        assert_eq!(
            unit_system_from_config(skycast_core::UnitSystem::Metric),
            skycast_weather::UnitSystem::Metric
        );
    }

    #[test]
    fn settings_follow_config() {
        let mut config = Config::default();
        config.weather.api_key = "abc".into();
        config.weather.request_timeout_secs = 3;

        let settings = provider_settings(&config);
        assert_eq!(settings.api_key, "abc");
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert_eq!(settings.api_base_url, config.weather.api_base_url);
    }

    #[test]
    fn runtime_is_shared() {
        let handle = get_or_init_runtime().unwrap();
        assert_eq!(handle.block_on(async { 6 * 7 }), 42);

        let again = get_or_init_runtime().unwrap();
        assert_eq!(again.block_on(async { 1 + 1 }), 2);
    }

    #[test]
    fn builds_model_from_config() {
        let mut config = Config::default();
        config.weather.units = skycast_core::UnitSystem::Imperial;

        let model = initialize_weather_model(&config).unwrap();
        assert_eq!(model.state().units(), skycast_weather::UnitSystem::Imperial);
    }
}
