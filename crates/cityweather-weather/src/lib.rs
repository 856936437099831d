//! Weather service for CityWeather
//!
//! Current conditions by city name from the OpenWeatherMap API.

pub mod provider;
pub mod types;

pub use provider::WeatherProvider;
pub use types::*;
