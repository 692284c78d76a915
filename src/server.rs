//! Gateway service: search and prayer-time orchestration

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheKey, ResponseCache};
use crate::city::{CityDirectory, contains_city};
use crate::config::ServerConfig;
use crate::error::{GatewayError, Result};
use crate::security::validation::InputValidator;
use crate::upstream::{
    PlaceItem, PlacesClient, PlacesProvider, PrayerClient, PrayerTimesProvider, PrayerTimesResponse,
};

/// Body of a random-nearest-mosque request.
///
/// Missing fields take zero values and are then caught by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: i64,
    pub limit: i64,
    pub use_cache: bool,
}

/// Main gateway service shared by all HTTP handlers
pub struct TarawihService {
    places: Arc<dyn PlacesProvider>,
    prayer: Arc<dyn PrayerTimesProvider>,
    validator: InputValidator,
    cache: ResponseCache,
    cities: CityDirectory,
    use_response_cache: bool,
}

impl TarawihService {
    /// Create a service over the given providers
    pub fn new(
        places: Arc<dyn PlacesProvider>,
        prayer: Arc<dyn PrayerTimesProvider>,
        use_response_cache: bool,
    ) -> Self {
        Self {
            places,
            prayer,
            validator: InputValidator::default(),
            cache: ResponseCache::new(),
            cities: CityDirectory::new(),
            use_response_cache,
        }
    }

    /// Create a service talking to the real providers named in `config`
    pub fn from_config(config: &ServerConfig) -> Self {
        let http = reqwest::Client::new();
        let places = PlacesClient::new(
            http.clone(),
            config.places_base_url.clone(),
            config.places_api_key.clone(),
        );
        let prayer = PrayerClient::new(http, config.prayer_base_url.clone());

        Self::new(Arc::new(places), Arc::new(prayer), config.use_response_cache)
    }

    pub fn with_validator(mut self, validator: InputValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Pick one mosque at random from the search results around a point.
    ///
    /// Cached results are served only when the cache is enabled, the caller
    /// asked for it and a non-empty entry exists. Every live fetch is stored
    /// when the cache is enabled, whatever the caller asked.
    #[instrument(skip(self), level = "debug")]
    pub async fn random_nearest_mosque(&self, request: SearchRequest) -> Result<PlaceItem> {
        let query = self.validator.validate_search(&request)?;
        let key = CacheKey::from(&query);

        let cached = if self.use_response_cache && request.use_cache {
            self.cache.get(&key).await.filter(|items| !items.is_empty())
        } else {
            None
        };

        let items = match cached {
            Some(items) => {
                debug!("Cache hit for {}", key);
                items
            }
            None => {
                let response = self.places.search(&query).await.inspect_err(|e| {
                    warn!("Places search failed for {}: {}", key, e);
                })?;
                if self.use_response_cache {
                    self.cache.put(key, response.items.clone()).await;
                }
                response.items
            }
        };

        items
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| GatewayError::not_found("No mosque found"))
    }

    /// Today's prayer schedule for a free-text city name
    pub async fn prayer_times(&self, city: Option<&str>) -> Result<PrayerTimesResponse> {
        self.prayer_times_on(city, Local::now().date_naive()).await
    }

    /// Prayer schedule for a free-text city name on `date`
    #[instrument(skip(self), level = "debug")]
    pub async fn prayer_times_on(&self, city: Option<&str>, date: NaiveDate) -> Result<PrayerTimesResponse> {
        let city = self.validator.require_param("city", city)?;

        let records = self.cities.records(self.prayer.as_ref()).await?;
        let city_id = contains_city(city, &records)
            .ok_or_else(|| GatewayError::not_found("City not found"))?;

        info!("Resolved city {:?} to provider id {}", city, city_id);

        let date = date.format("%Y-%m-%d").to_string();
        self.prayer.schedule(city_id, &date).await.inspect_err(|e| {
            warn!("Prayer schedule fetch failed for {}: {}", city_id, e);
        })
    }
}
