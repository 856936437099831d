use crate::types::{ApiErrorBody, ApiWeatherResponse, TemperatureUnit, WeatherError, WeatherRecord};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    unit: TemperatureUnit,
}

impl WeatherProvider {
    /// `base_url` is the API root; `/weather` is appended per request.
    pub fn new(
        base_url: &str,
        api_key: &str,
        unit: TemperatureUnit,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            unit,
        })
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Current weather for `city_name`.
    #[instrument(skip(self), level = "info")]
    pub async fn get_weather(&self, city_name: &str) -> Result<WeatherRecord, WeatherError> {
        let mut params = vec![("q", city_name), ("appid", self.api_key.as_str())];
        if let Some(units) = self.unit.query_value() {
            params.push(("units", units));
        }

        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.message)
                .unwrap_or(text);
            return Err(WeatherError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ApiWeatherResponse =
            serde_json::from_str(&text).map_err(|e| WeatherError::Parse(e.to_string()))?;

        let record = WeatherRecord::from_api(body, city_name, self.unit)?;
        tracing::info!("Weather for {}: {}", record.city_name, record.description);
        Ok(record)
    }
}
