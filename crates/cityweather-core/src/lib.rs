pub mod app;
pub mod config;
pub mod error;
pub mod store;

pub use app::App;
pub use config::{
    CatalogConfig, Config, LoggingConfig, TemperatureUnit, UiConfig, ValidationResult,
    WeatherConfig,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, StorageError, WeatherError};
pub use store::{KeyValueStore, SELECTED_CITY_KEY};

use anyhow::Result;

/// Initialize logging.
///
/// `RUST_LOG` wins over `default_level`. Output goes to stderr so it never
/// interleaves with the screen drawn on stdout.
pub fn init(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

    tracing::info!("CityWeather core initialized");
    Ok(())
}
