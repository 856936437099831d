//! Weather backend: async weather fetching.
//! All network work runs on the shared runtime; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use cityweather_weather::{WeatherError, WeatherProvider, WeatherRecord};
use tokio_util::sync::CancellationToken;

/// Messages sent from async operations back to the screen model
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of fetching weather for `city`
    FetchDone {
        city: String,
        result: Result<WeatherRecord, WeatherError>,
    },
}

/// Request current weather for `city`.
/// Sends `FetchDone` on the channel when complete.
pub fn request_fetch(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &tokio::runtime::Handle,
    provider: Arc<WeatherProvider>,
    city: String,
    token: CancellationToken,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!(%city, "Weather fetch cancelled");
            }
            result = provider.get_weather(&city) => {
                let _ = tx.send(WeatherServiceMessage::FetchDone { city, result });
            }
        }
    });
}
