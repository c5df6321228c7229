use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Measurement convention for temperatures and wind speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Temperature symbol shown next to every temperature
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    /// Wind speed unit the API reports in for this system
    pub fn speed_unit(&self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }

    /// Label for unit pickers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Metric => "Celsius (°C)",
            Self::Imperial => "Fahrenheit (°F)",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query())
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(Self::Metric),
            "imperial" | "fahrenheit" | "f" => Ok(Self::Imperial),
            other => Err(format!(
                "unknown unit system '{}' (expected metric or imperial)",
                other
            )),
        }
    }
}

/// Geographic coordinate pair as reported by the conditions endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Wind vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    /// Meteorological direction in degrees (where the wind comes from)
    pub deg: f64,
}

impl Wind {
    /// 16-point compass abbreviation for the wind direction
    pub fn compass_point(&self) -> &'static str {
        const POINTS: [&str; 16] = [
            "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W",
            "WNW", "NW", "NNW",
        ];
        let normalized = self.deg.rem_euclid(360.0);
        let index = ((normalized / 22.5).round() as usize) % POINTS.len();
        POINTS[index]
    }
}

/// Current conditions for a searched location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionsResult {
    pub name: String,
    pub coord: Coordinates,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub wind: Wind,
    /// Weather category, e.g. "Clear" or "Rain"
    pub condition: String,
    pub icon: String,
}

/// One time bucket of the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Timestamp text as sent by the API (`YYYY-MM-DD HH:MM:SS`, UTC)
    pub timestamp: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

impl ForecastEntry {
    /// Parsed timestamp, if the API sent the usual format
    pub fn time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%d %H:%M:%S").ok()
    }
}

/// Round a reading for display, half away from zero
pub fn rounded(value: f64) -> i64 {
    let r = value.round() as i64;
    // avoid "-0"
    if r == 0 {
        0
    } else {
        r
    }
}

// Wire format of the OpenWeatherMap responses.

#[derive(Debug, Deserialize)]
pub(crate) struct ApiConditions {
    name: String,
    coord: Coordinates,
    main: ApiMain,
    wind: ApiWind,
    #[serde(default)]
    weather: Vec<ApiWeather>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct ApiWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecast {
    #[serde(default)]
    list: Vec<ApiForecastItem>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastItem {
    dt_txt: String,
    main: ApiForecastMain,
    #[serde(default)]
    weather: Vec<ApiWeather>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastMain {
    temp: f64,
}

/// Error body returned by the API on failure, e.g. `{"cod":"404","message":"city not found"}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

impl TryFrom<ApiConditions> for ConditionsResult {
    type Error = WeatherError;

    fn try_from(api: ApiConditions) -> Result<Self, Self::Error> {
        let weather = api
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("conditions response has no weather entry".into()))?;

        Ok(Self {
            name: api.name,
            coord: api.coord,
            temperature: api.main.temp,
            feels_like: api.main.feels_like,
            temp_max: api.main.temp_max,
            humidity: api.main.humidity,
            wind: Wind {
                speed: api.wind.speed,
                deg: api.wind.deg,
            },
            condition: weather.main,
            icon: weather.icon,
        })
    }
}

impl ApiForecast {
    pub(crate) fn into_entries(self) -> Result<Vec<ForecastEntry>, WeatherError> {
        self.list
            .into_iter()
            .map(|item| -> Result<ForecastEntry, WeatherError> {
                let weather = item.weather.into_iter().next().ok_or_else(|| {
                    WeatherError::Parse(format!("forecast entry {} has no weather entry", item.dt_txt))
                })?;
                Ok(ForecastEntry {
                    timestamp: item.dt_txt,
                    temperature: item.main.temp,
                    description: weather.description,
                    icon: weather.icon,
                })
            })
            .collect()
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}
