//! Shared services handed to every screen model.
//!
//! One `AppServices` is built at startup and passed around explicitly as an
//! `Arc`. It owns the tokio runtime that runs all network work, the HTTP
//! clients, the persistent key-value store and the root cancellation token.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use cityweather_catalog::CatalogClient;
use cityweather_core::{App, Config, KeyValueStore, TemperatureUnit};
use cityweather_weather::WeatherProvider;

pub struct AppServices {
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    /// Cancelled on shutdown; every fetch runs under a child token
    shutdown_token: CancellationToken,

    config: Arc<Config>,

    /// Persistent key-value state (`selectedCity`)
    store: Arc<Mutex<KeyValueStore>>,

    catalog_client: Arc<CatalogClient>,

    weather_provider: Arc<WeatherProvider>,
}

impl AppServices {
    pub fn new(app: &App) -> Result<Arc<Self>> {
        let config = app.config().clone();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("cityweather-tokio")
            .build()
            .context("Failed to create tokio runtime")?;

        let catalog_client = CatalogClient::new(
            &config.catalog.base_url,
            Duration::from_secs(config.catalog.timeout_secs),
        )
        .context("Failed to create catalog client")?;

        let api_key = config.weather.effective_api_key().unwrap_or_default();
        let weather_provider = WeatherProvider::new(
            &config.weather.base_url,
            &api_key,
            weather_unit(config.weather.temperature_unit),
            Duration::from_secs(config.weather.timeout_secs),
        )
        .context("Failed to create weather provider")?;

        tracing::info!(
            "Services initialized (catalog: {}, weather: {})",
            catalog_client.records_url(),
            config.weather.base_url
        );

        Ok(Arc::new(Self {
            runtime,
            shutdown_token: CancellationToken::new(),
            config,
            store: app.store(),
            catalog_client: Arc::new(catalog_client),
            weather_provider: Arc::new(weather_provider),
        }))
    }

    /// Get the tokio runtime handle.
    pub fn runtime(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> Arc<Mutex<KeyValueStore>> {
        self.store.clone()
    }

    pub fn catalog_client(&self) -> Arc<CatalogClient> {
        self.catalog_client.clone()
    }

    pub fn weather_provider(&self) -> Arc<WeatherProvider> {
        self.weather_provider.clone()
    }

    /// Token for one fetch; cancelled individually or on shutdown.
    pub fn child_token(&self) -> CancellationToken {
        self.shutdown_token.child_token()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Cancel every outstanding fetch.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        self.shutdown_token.cancel();
    }
}

fn weather_unit(unit: TemperatureUnit) -> cityweather_weather::TemperatureUnit {
    match unit {
        TemperatureUnit::Standard => cityweather_weather::TemperatureUnit::Standard,
        TemperatureUnit::Metric => cityweather_weather::TemperatureUnit::Metric,
        TemperatureUnit::Imperial => cityweather_weather::TemperatureUnit::Imperial,
    }
}
