use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit system requested from the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Kelvin and m/s; the API default, sent without a `units` parameter
    #[default]
    Standard,
    Metric,
    Imperial,
}

impl TemperatureUnit {
    /// Value of the `units` query parameter, if one is sent
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            Self::Standard => None,
            Self::Metric => Some("metric"),
            Self::Imperial => Some("imperial"),
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Self::Standard => "K",
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    pub fn wind_speed_symbol(&self) -> &'static str {
        match self {
            Self::Standard | Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

/// Current weather for one city. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// City name as the service resolved it
    pub city_name: String,
    pub temperature: f64,
    pub description: String,
    /// Percent
    pub humidity: f64,
    pub wind_speed: f64,
    /// hPa
    pub pressure: f64,
    pub unit: TemperatureUnit,
    pub fetched_at: DateTime<Utc>,
}

/// Subset of the `/weather` response that is read
#[derive(Debug, Deserialize)]
pub(crate) struct ApiWeatherResponse {
    #[serde(default)]
    pub name: Option<String>,
    pub main: ApiMain,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
    pub wind: ApiWind,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMain {
    pub temp: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCondition {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiWind {
    pub speed: f64,
}

/// Error body, e.g. `{"cod":"404","message":"city not found"}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}

impl WeatherRecord {
    pub(crate) fn from_api(
        response: ApiWeatherResponse,
        requested_city: &str,
        unit: TemperatureUnit,
    ) -> Result<Self, WeatherError> {
        let description = response
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| WeatherError::Parse("response has no weather conditions".into()))?;

        Ok(Self {
            city_name: response
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| requested_city.to_string()),
            temperature: response.main.temp,
            description,
            humidity: response.main.humidity,
            wind_speed: response.wind.speed,
            pressure: response.main.pressure,
            unit,
            fetched_at: Utc::now(),
        })
    }

    /// Fetch time as `HH:MM UTC`.
    pub fn updated_label(&self) -> String {
        self.fetched_at.format("%H:%M UTC").to_string()
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
