//! HTTP client for the Google Distance Matrix API and the office
//! enrichment pass built on it.

use std::time::Duration;

use reqwest::{Client, Url};
use tracing::{info, warn};

use dmvscout_core::OfficeRecord;

use crate::error::DistanceError;
use crate::types::MatrixResponse;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// The API caps destinations per request; batches are sized to it.
pub const MAX_DESTINATIONS_PER_REQUEST: usize = 10;

/// Client for the Distance Matrix `json` endpoint.
///
/// Use [`DistanceClient::new`] for production or
/// [`DistanceClient::with_base_url`] to point at a mock server in tests.
pub struct DistanceClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl DistanceClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, DistanceError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`DistanceError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, DistanceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("dmvscout/0.1 (appointment-scout)")
            .build()?;
        let base_url = Url::parse(base_url).map_err(|e| DistanceError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches travel durations from `origin` to each destination, aligned
    /// by request order. An element the API could not resolve (no
    /// `duration`) comes back as `None`; the result is always exactly
    /// `destinations.len()` long.
    ///
    /// # Errors
    ///
    /// - [`DistanceError::UnexpectedStatus`] on a non-2xx response.
    /// - [`DistanceError::Deserialize`] when the body is not a matrix
    ///   response.
    /// - [`DistanceError::Http`] on network failure.
    pub async fn batch_durations(
        &self,
        origin: &str,
        destinations: &[&str],
    ) -> Result<Vec<Option<u64>>, DistanceError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("origins", origin)
            .append_pair("destinations", &destinations.join("|"))
            .append_pair("key", &self.api_key)
            .append_pair("units", "imperial");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DistanceError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: MatrixResponse =
            serde_json::from_str(&body).map_err(|e| DistanceError::Deserialize { source: e })?;

        let mut durations: Vec<Option<u64>> = parsed
            .rows
            .into_iter()
            .next()
            .map(|row| {
                row.elements
                    .into_iter()
                    .map(|element| element.duration.map(|d| d.value))
                    .collect()
            })
            .unwrap_or_default();

        // Keep the alignment contract even against a malformed row.
        durations.resize(destinations.len(), None);
        Ok(durations)
    }
}

/// Attaches travel times to the scraped offices, in batches of
/// [`MAX_DESTINATIONS_PER_REQUEST`], preserving office order.
///
/// A failed batch is logged and leaves that batch's offices without a
/// travel time; later batches still run and stay correctly aligned.
/// Offices with no address are skipped without consuming a slot in the
/// request.
pub async fn enrich_offices(client: &DistanceClient, origin: &str, offices: &mut [OfficeRecord]) {
    let total = offices.len();
    info!(offices = total, origin, "enriching offices with travel times");

    for chunk in offices.chunks_mut(MAX_DESTINATIONS_PER_REQUEST) {
        let addresses: Vec<&str> = chunk.iter().filter_map(|o| o.address.as_deref()).collect();
        if addresses.is_empty() {
            continue;
        }

        match client.batch_durations(origin, &addresses).await {
            Ok(durations) => {
                let mut results = durations.into_iter();
                for office in chunk.iter_mut() {
                    if office.address.is_some() {
                        office.travel_secs = results.next().flatten();
                    }
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    offices = chunk.len(),
                    "distance batch failed, leaving its travel times unset"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
