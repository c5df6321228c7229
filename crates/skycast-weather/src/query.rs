//! Request URL construction for the conditions, forecast and icon endpoints.
//!
//! Endpoints are parsed once up front; building a request URL afterwards
//! cannot fail. Location text is percent-encoded but otherwise passed through
//! untouched, so the remote service decides what a valid location is.

use url::Url;

use crate::types::{Coordinates, UnitSystem, WeatherError};

pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_ICON_BASE: &str = "https://openweathermap.org/img/wn";

#[derive(Clone)]
pub struct QueryBuilder {
    conditions_endpoint: Url,
    forecast_endpoint: Url,
    icon_base: String,
    api_key: String,
}

impl QueryBuilder {
    /// Create a builder for the API rooted at `api_base`.
    ///
    /// Fails only when `api_base` is not a valid absolute URL.
    pub fn new(api_base: &str, api_key: &str, icon_base: &str) -> Result<Self, WeatherError> {
        // join() replaces the last segment unless the base ends in a slash
        let base = Url::parse(&format!("{}/", api_base.trim_end_matches('/')))?;

        Ok(Self {
            conditions_endpoint: base.join("weather")?,
            forecast_endpoint: base.join("forecast")?,
            icon_base: icon_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// `GET {base}/weather?q=..&appid=..&units=..`
    pub fn conditions_url(&self, location: &str, units: UnitSystem) -> Url {
        let mut url = self.conditions_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", location)
            .append_pair("appid", &self.api_key)
            .append_pair("units", units.as_query());
        url
    }

    /// `GET {base}/forecast?lat=..&lon=..&appid=..&units=..`
    pub fn forecast_url(&self, coord: Coordinates, units: UnitSystem) -> Url {
        let mut url = self.forecast_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &coord.lat.to_string())
            .append_pair("lon", &coord.lon.to_string())
            .append_pair("appid", &self.api_key)
            .append_pair("units", units.as_query());
        url
    }

    /// Image URL for an icon identifier such as `01d`. Not validated.
    pub fn icon_url(&self, icon: &str) -> String {
        format!("{}/{}.png", self.icon_base, icon)
    }
}

impl std::fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("conditions_endpoint", &self.conditions_endpoint.as_str())
            .field("forecast_endpoint", &self.forecast_endpoint.as_str())
            .field("icon_base", &self.icon_base)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
