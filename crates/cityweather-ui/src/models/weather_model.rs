//! Weather viewer screen.

use std::sync::mpsc;
use std::sync::Arc;

use cityweather_core::SELECTED_CITY_KEY;
use cityweather_weather::WeatherRecord;
use tokio_util::sync::CancellationToken;

use crate::app_services::AppServices;
use crate::error_mapping::log_fetch_failure;
use crate::services::{self, WeatherServiceMessage};

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherViewState {
    Loading,
    Loaded(WeatherRecord),
}

pub struct WeatherModel {
    services: Arc<AppServices>,
    route_city: Option<String>,
    city: Option<String>,
    view: WeatherViewState,
    tx: mpsc::Sender<WeatherServiceMessage>,
    rx: mpsc::Receiver<WeatherServiceMessage>,
    inflight: Option<CancellationToken>,
    mounted: bool,
}

impl WeatherModel {
    /// `route_city` is the city named in the route, if any.
    pub fn new(services: Arc<AppServices>, route_city: Option<String>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            services,
            route_city,
            city: None,
            view: WeatherViewState::Loading,
            tx,
            rx,
            inflight: None,
            mounted: false,
        }
    }

    /// Resolved city; `None` before mount or when nothing was selected.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn view(&self) -> &WeatherViewState {
        &self.view
    }

    /// The weather request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.inflight.is_some()
    }

    /// Resolve the city and issue the single weather request.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        let city = self
            .route_city
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| {
                self.services
                    .store()
                    .lock()
                    .get(SELECTED_CITY_KEY)
                    .filter(|c| !c.trim().is_empty())
                    .map(str::to_string)
            });

        let Some(city) = city else {
            tracing::warn!("No city selected; weather stays loading");
            return;
        };

        let token = self.services.child_token();
        services::request_weather_fetch(
            &self.tx,
            &self.services.runtime(),
            self.services.weather_provider(),
            city.clone(),
            token.clone(),
        );
        self.city = Some(city);
        self.inflight = Some(token);
    }

    /// Apply the finished fetch. Returns true when anything was received.
    pub fn poll_channel(&mut self) -> bool {
        let msg = match self.rx.try_recv() {
            Ok(m) => m,
            Err(_) => return false,
        };

        match msg {
            WeatherServiceMessage::FetchDone { city, result } => {
                self.inflight = None;
                match result {
                    Ok(record) => self.view = WeatherViewState::Loaded(record),
                    Err(e) => {
                        log_fetch_failure(&format!("Failed to fetch weather for {city}"), e)
                    }
                }
            }
        }
        true
    }

    pub fn teardown(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
    }
}

impl Drop for WeatherModel {
    fn drop(&mut self) {
        self.teardown();
    }
}
