//! Catalog API client.

use std::time::Duration;

use tracing::instrument;

use crate::error::CatalogError;
use crate::pagination::PAGE_SIZE;
use crate::types::{CityRecord, RecordsResponse};

const USER_AGENT: &str = concat!("CityWeather/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// `base_url` is the dataset URL; `/records` is appended per request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn records_url(&self) -> String {
        format!("{}/records", self.base_url)
    }

    /// Fetch one page of cities (1-based, `PAGE_SIZE` per page).
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<CityRecord>, CatalogError> {
        let response = self
            .client
            .get(self.records_url())
            .query(&[("limit", PAGE_SIZE.to_string()), ("page", page.to_string())])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: RecordsResponse =
            serde_json::from_str(&text).map_err(|e| CatalogError::Parse(e.to_string()))?;

        tracing::debug!(
            "Catalog page {} returned {} records (total {:?})",
            page,
            body.results.len(),
            body.total_count
        );

        Ok(body.results)
    }
}
