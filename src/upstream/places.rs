//! Places-search provider client

use async_trait::async_trait;
use tracing::debug;

use super::{PlaceQuery, PlacesProvider, PlacesResponse, get_json};
use crate::error::Result;

/// Search term sent to the discover endpoint
const SEARCH_TERM: &str = "masjid";

/// HTTP client for the places discover API
#[derive(Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Discover URL for a query, coordinates at six decimal places
    pub fn search_url(&self, query: &PlaceQuery) -> String {
        format!(
            "{}/v1/discover?q={}&in=circle:{:.6},{:.6};r={}&limit={}&apikey={}",
            self.base_url,
            SEARCH_TERM,
            query.latitude,
            query.longitude,
            query.radius,
            query.limit,
            self.api_key
        )
    }
}

#[async_trait]
impl PlacesProvider for PlacesClient {
    async fn search(&self, query: &PlaceQuery) -> Result<PlacesResponse> {
        debug!(
            "Searching places around {:.6},{:.6} r={} limit={}",
            query.latitude, query.longitude, query.radius, query.limit
        );
        get_json(&self.http, &self.search_url(query)).await
    }
}
