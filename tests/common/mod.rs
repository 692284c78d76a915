#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, Response},
};
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tarawihdimana::error::{GatewayError, Result};
use tarawihdimana::security::SecurityConfig;
use tarawihdimana::upstream::{
    CityListResponse, CityRecord, PlaceItem, PlaceQuery, PlacesProvider, PlacesResponse,
    PrayerTimesProvider, PrayerTimesResponse,
};
use tarawihdimana::{HttpTransport, TarawihService};

/// Test utilities for integration testing
pub mod test_utils {
    use super::*;

    pub fn create_test_mosque(title: &str) -> PlaceItem {
        serde_json::from_value(json!({
            "title": title,
            "address": {
                "label": format!("{}, Bandung, Jawa Barat, Indonesia", title),
                "countryCode": "IDN",
                "countryName": "Indonesia",
                "city": "Bandung"
            },
            "position": {"lat": -6.9218, "lng": 107.6071},
            "access": [{"lat": -6.9217, "lng": 107.6072}],
            "distance": 350,
            "categories": [{"id": "300-3200-0030", "name": "Mosque", "primary": true}]
        }))
        .expect("valid place item")
    }

    pub fn create_test_cities() -> Vec<CityRecord> {
        [
            ("1204", "KAB. BOGOR"),
            ("1206", "KOTA BOGOR"),
            ("1219", "KOTA BANDUNG"),
            ("1301", "KOTA JAKARTA"),
        ]
        .into_iter()
        .map(|(id, lokasi)| CityRecord {
            id: id.to_string(),
            lokasi: lokasi.to_string(),
        })
        .collect()
    }

    pub fn search_body(latitude: f64, longitude: f64, radius: i64, limit: i64, use_cache: bool) -> Value {
        json!({
            "latitude": latitude,
            "longitude": longitude,
            "radius": radius,
            "limit": limit,
            "useCache": use_cache
        })
    }

    pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request")
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    pub async fn body_json(response: Response<Body>) -> Value {
        serde_json::from_str(&body_text(response).await).expect("json body")
    }
}

/// Places provider returning a fixed result set and counting calls
#[derive(Default)]
pub struct FakePlaces {
    pub items: Vec<PlaceItem>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakePlaces {
    pub fn with_items(items: Vec<PlaceItem>) -> Arc<Self> {
        Arc::new(Self {
            items,
            ..Self::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlacesProvider for FakePlaces {
    async fn search(&self, _query: &PlaceQuery) -> Result<PlacesResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            let cause = serde_json::from_str::<Value>("<html>").unwrap_err();
            return Err(GatewayError::ParseResponse(cause));
        }
        Ok(PlacesResponse {
            items: self.items.clone(),
        })
    }
}

/// Prayer provider serving a fixed city list and echoing schedules
#[derive(Default)]
pub struct FakePrayer {
    pub cities: Vec<CityRecord>,
    /// City-list loads still to fail before the list is served
    pub list_failures: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub schedule_calls: AtomicUsize,
}

impl FakePrayer {
    pub fn with_cities(cities: Vec<CityRecord>) -> Arc<Self> {
        Arc::new(Self {
            cities,
            ..Self::default()
        })
    }

    pub fn failing_list_once(cities: Vec<CityRecord>) -> Arc<Self> {
        Arc::new(Self {
            cities,
            list_failures: AtomicUsize::new(1),
            ..Self::default()
        })
    }

    pub fn upstream_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.schedule_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrayerTimesProvider for FakePrayer {
    async fn list_cities(&self) -> Result<CityListResponse> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .list_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            let cause = serde_json::from_str::<Value>("<html>").unwrap_err();
            return Err(GatewayError::ParseResponse(cause));
        }
        Ok(CityListResponse {
            status: true,
            data: self.cities.clone(),
        })
    }

    async fn schedule(&self, city_id: &str, date: &str) -> Result<PrayerTimesResponse> {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        let lokasi = self
            .cities
            .iter()
            .find(|city| city.id == city_id)
            .map(|city| city.lokasi.clone())
            .unwrap_or_default();

        Ok(serde_json::from_value(json!({
            "data": {
                "id": city_id.parse::<i64>().unwrap_or_default(),
                "lokasi": lokasi,
                "daerah": "JAWA BARAT",
                "jadwal": {
                    "tanggal": "test",
                    "imsak": "04:21",
                    "subuh": "04:31",
                    "terbit": "05:45",
                    "dhuha": "06:14",
                    "dzuhur": "11:58",
                    "ashar": "15:10",
                    "maghrib": "18:05",
                    "isya": "19:14",
                    "date": date
                }
            }
        }))
        .expect("valid schedule"))
    }
}

/// Test server configuration
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub use_response_cache: bool,
    pub rate_limit_max: u32,
    pub cors_origins: Vec<String>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            use_response_cache: false,
            rate_limit_max: 1000,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl TestServerConfig {
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_response_cache = enabled;
        self
    }

    pub fn with_rate_limit(mut self, rate: u32) -> Self {
        self.rate_limit_max = rate;
        self
    }

    pub fn with_origins(mut self, origins: &[&str]) -> Self {
        self.cors_origins = origins.iter().map(|o| o.to_string()).collect();
        self
    }

    /// Router wired to the given fakes, as the binary wires the real clients
    pub fn router(&self, places: Arc<FakePlaces>, prayer: Arc<FakePrayer>) -> Router {
        let service = Arc::new(TarawihService::new(places, prayer, self.use_response_cache));
        HttpTransport::with_config(
            "127.0.0.1".to_string(),
            0,
            self.cors_origins.clone(),
            SecurityConfig {
                rate_limit_max: self.rate_limit_max,
            },
        )
        .create_router(service)
    }
}
