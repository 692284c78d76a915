//! Prayer-times and city-list provider client

use async_trait::async_trait;
use tracing::debug;

use super::{CityListResponse, PrayerTimesProvider, PrayerTimesResponse, get_json};
use crate::error::Result;

/// HTTP client for the prayer schedule API
#[derive(Clone)]
pub struct PrayerClient {
    http: reqwest::Client,
    base_url: String,
}

impl PrayerClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn cities_url(&self) -> String {
        format!("{}/v2/sholat/kota/semua", self.base_url)
    }

    pub fn schedule_url(&self, city_id: &str, date: &str) -> String {
        format!("{}/v2/sholat/jadwal/{}/{}", self.base_url, city_id, date)
    }
}

#[async_trait]
impl PrayerTimesProvider for PrayerClient {
    async fn list_cities(&self) -> Result<CityListResponse> {
        debug!("Fetching city list");
        get_json(&self.http, &self.cities_url()).await
    }

    async fn schedule(&self, city_id: &str, date: &str) -> Result<PrayerTimesResponse> {
        debug!("Fetching prayer schedule for city {} on {}", city_id, date);
        get_json(&self.http, &self.schedule_url(city_id, date)).await
    }
}
