//! Upstream provider clients
//!
//! Two third-party REST APIs sit behind the gateway:
//! - places: nearby mosque discovery (API key required)
//! - prayer: city list and daily prayer schedule (no key)
//!
//! Both are reached through the [`PlacesProvider`] and [`PrayerTimesProvider`]
//! traits so the service can be driven by fakes in tests.

pub mod places;
pub mod prayer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{GatewayError, Result};

pub use places::PlacesClient;
pub use prayer::PrayerClient;

/// Geographic point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Structured postal address of a place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub label: String,
    pub country_code: String,
    pub country_name: String,
    pub county_code: String,
    pub county: String,
    pub city: String,
    pub district: String,
    pub subdistrict: String,
    pub street: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub primary: bool,
}

/// One search hit from the places provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceItem {
    pub title: String,
    pub address: Address,
    pub position: Location,
    pub access: Vec<Location>,
    pub distance: i64,
    pub categories: Vec<Category>,
}

/// Envelope returned by the places discover endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesResponse {
    pub items: Vec<PlaceItem>,
}

/// Parameters of a circular places search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: i64,
    pub limit: i64,
}

/// City known to the prayer-times provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityRecord {
    pub id: String,
    pub lokasi: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CityListResponse {
    pub status: bool,
    pub data: Vec<CityRecord>,
}

/// Named prayer time points for one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Jadwal {
    pub tanggal: String,
    pub imsak: String,
    pub subuh: String,
    pub terbit: String,
    pub dhuha: String,
    pub dzuhur: String,
    pub ashar: String,
    pub maghrib: String,
    pub isya: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrayerSchedule {
    pub id: i64,
    pub lokasi: String,
    pub daerah: String,
    pub jadwal: Jadwal,
}

/// Envelope returned by the schedule endpoint, passed through to callers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrayerTimesResponse {
    pub data: PrayerSchedule,
}

/// Source of nearby places
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn search(&self, query: &PlaceQuery) -> Result<PlacesResponse>;
}

/// Source of cities and their prayer schedules
#[async_trait]
pub trait PrayerTimesProvider: Send + Sync {
    async fn list_cities(&self) -> Result<CityListResponse>;

    /// `date` is an ISO calendar date (`YYYY-MM-DD`)
    async fn schedule(&self, city_id: &str, date: &str) -> Result<PrayerTimesResponse>;
}

/// Issue a GET and decode the JSON body, tagging transport and decode failures apart.
///
/// The HTTP status is not inspected: an error page simply fails to decode.
pub(crate) async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    let body = client
        .get(url)
        .send()
        .await
        .map_err(GatewayError::OutboundCall)?
        .bytes()
        .await
        .map_err(GatewayError::OutboundCall)?;

    serde_json::from_slice(&body).map_err(GatewayError::ParseResponse)
}
