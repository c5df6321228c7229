//! OpenWeatherMap HTTP client.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::query::{QueryBuilder, DEFAULT_API_BASE, DEFAULT_ICON_BASE};
use crate::types::{
    ApiConditions, ApiErrorBody, ApiForecast, ConditionsResult, Coordinates, ForecastEntry,
    UnitSystem, WeatherError,
};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("Skycast/", env!("CARGO_PKG_VERSION"));

/// Settings a [`WeatherProvider`] is built from.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub api_base_url: String,
    pub icon_base_url: String,
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            icon_base_url: DEFAULT_ICON_BASE.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    queries: QueryBuilder,
}

impl WeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let queries = QueryBuilder::new(
            &settings.api_base_url,
            &settings.api_key,
            &settings.icon_base_url,
        )?;

        Ok(Self {
            client: Arc::new(client),
            queries,
        })
    }

    /// URL builder shared with the renderer for icon links.
    pub fn queries(&self) -> &QueryBuilder {
        &self.queries
    }

    /// Fetch current conditions for a free-text location.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_conditions(
        &self,
        location: &str,
        units: UnitSystem,
    ) -> Result<ConditionsResult, WeatherError> {
        let url = self.queries.conditions_url(location, units);
        let response = self.client.get(url).send().await?;

        let api: ApiConditions = self.handle_response(response).await?;
        let conditions = ConditionsResult::try_from(api)?;

        tracing::info!(
            "Conditions for {} at {}, {}",
            conditions.name,
            conditions.coord.lat,
            conditions.coord.lon
        );
        Ok(conditions)
    }

    /// Fetch the multi-point forecast for a coordinate pair.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        coord: Coordinates,
        units: UnitSystem,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let url = self.queries.forecast_url(coord, units);
        let response = self.client.get(url).send().await?;

        let api: ApiForecast = self.handle_response(response).await?;
        let entries = api.into_entries()?;

        tracing::info!("Forecast has {} entries", entries.len());
        Ok(entries)
    }

    /// Decode a success body, or capture the service's `message` on failure.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        WeatherError::Network(e)
                    } else {
                        WeatherError::Parse(format!("JSON parse error: {}", e))
                    }
                });
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty());

        tracing::debug!("Weather API returned status {}", status);
        Err(WeatherError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
