use cityweather_core::{AppError, ReqwestErrorExt, WeatherError};
use cityweather_weather::WeatherError as ProviderError;

use super::IntoAppError;

impl IntoAppError for ProviderError {
    fn into_app_error(self) -> AppError {
        match self {
            ProviderError::Network(e) => AppError::Network(e.into_network_error()),
            ProviderError::Status { status: 401, .. } => AppError::Weather(WeatherError::InvalidApiKey),
            ProviderError::Status { status: 404, message } => {
                AppError::Weather(WeatherError::CityNotFound(message))
            }
            ProviderError::Status { status, .. } if status >= 500 => {
                AppError::Weather(WeatherError::ServiceUnavailable)
            }
            ProviderError::Status { status, message } => {
                AppError::Weather(WeatherError::ApiError(format!("{status}: {message}")))
            }
            ProviderError::Parse(msg) => AppError::Parse(msg),
        }
    }
}
