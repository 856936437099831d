pub mod catalog_service;
pub mod weather_service;

pub use catalog_service::{request_page, CatalogServiceMessage};
pub use weather_service::{request_fetch as request_weather_fetch, WeatherServiceMessage};
