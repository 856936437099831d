pub mod city_browser_model;
pub mod context_menu;
pub mod weather_model;

pub use city_browser_model::CityBrowserModel;
pub use context_menu::{ContextMenu, MenuItem};
pub use weather_model::{WeatherModel, WeatherViewState};
