//! Catalog backend: async page fetching.
//! All network work runs on the shared runtime; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use cityweather_catalog::{CatalogClient, CatalogError, CityRecord, PageRequest};
use tokio_util::sync::CancellationToken;

/// Messages sent from async operations back to the screen model
#[derive(Debug)]
pub enum CatalogServiceMessage {
    /// Result of fetching one page; echoes the request so stale results can be dropped
    PageDone {
        request: PageRequest,
        result: Result<Vec<CityRecord>, CatalogError>,
    },
}

/// Fetch `request.page` asynchronously.
/// Sends `PageDone` unless `token` is cancelled first, in which case nothing is sent.
pub fn request_page(
    tx: &Sender<CatalogServiceMessage>,
    runtime: &tokio::runtime::Handle,
    client: Arc<CatalogClient>,
    request: PageRequest,
    token: CancellationToken,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!(page = request.page, "Page fetch cancelled");
            }
            result = client.fetch_page(request.page) => {
                let _ = tx.send(CatalogServiceMessage::PageDone { request, result });
            }
        }
    });
}
