//! Configuration management
//!
//! The gateway reads its environment exactly once at startup into a
//! [`ServerConfig`]; handlers receive the values through the service objects
//! built from it.

use thiserror::Error;

pub const DEFAULT_RATE_LIMIT: u32 = 10;
pub const DEFAULT_PLACES_BASE_URL: &str = "https://discover.search.hereapi.com";
pub const DEFAULT_PRAYER_BASE_URL: &str = "https://api.myquran.com";

/// Configuration errors that abort startup
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("HERE API key not provided (set HERE_API_KEY)")]
    MissingApiKey,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host (default: 0.0.0.0)
    pub host: String,
    /// Server port (default: 9999)
    pub port: u16,
    /// Log level (default: info)
    pub log_level: String,
    /// API key for the places-search provider
    pub places_api_key: String,
    /// Root URL of the places-search provider
    pub places_base_url: String,
    /// Root URL of the prayer-times and city-list provider
    pub prayer_base_url: String,
    /// Origins allowed by CORS, `*` allows any
    pub allowed_origins: Vec<String>,
    /// Whether search results are stored in and served from the response cache
    pub use_response_cache: bool,
    /// Token bucket size and refill rate per second
    pub rate_limit_max: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9999,
            log_level: "info".to_string(),
            places_api_key: String::new(),
            places_base_url: DEFAULT_PLACES_BASE_URL.to_string(),
            prayer_base_url: DEFAULT_PRAYER_BASE_URL.to_string(),
            allowed_origins: vec!["*".to_string()],
            use_response_cache: false,
            rate_limit_max: DEFAULT_RATE_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let places_api_key = lookup("HERE_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let defaults = Self::default();

        Ok(Self {
            places_api_key,
            places_base_url: lookup("HERE_API_BASE_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.places_base_url),
            prayer_base_url: lookup("MYQURAN_API_BASE_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.prayer_base_url),
            allowed_origins: parse_allowed_origins(lookup("ALLOWED_ORIGINS").as_deref()),
            use_response_cache: lookup("SEARCH_RESPONSE_USE_CACHE")
                .as_deref()
                .and_then(parse_bool)
                .unwrap_or(false),
            rate_limit_max: parse_rate_limit(lookup("RATE_LIMIT_MAX").as_deref()),
            ..defaults
        })
    }
}

/// Split a comma-separated origin list, falling back to `*`
pub fn parse_allowed_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}

/// Boolean spellings accepted for feature flags
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Requests per second for the limiter; zero and garbage fall back to the default
pub fn parse_rate_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(DEFAULT_RATE_LIMIT)
}
