//! City name normalisation and the lazily loaded city directory
//!
//! Free-text city names are compared through [`normalize_city_name`]:
//! 1. the raw name, mapped through Unicode title case, is looked up in the
//!    district alias table (five Jakarta districts → `Jakarta`);
//! 2. the result is upper-cased;
//! 3. the first matching administrative prefix (`KAB. `, `KOTA `) is removed.
//!
//! The alias lookup sees the title-case projection while prefix stripping sees
//! the upper-case one. The two agree for ASCII and differ only on the Latin
//! digraph letters, which keep their title form in step 1.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::Result;
use crate::upstream::{CityRecord, PrayerTimesProvider};

const IGNORED_PREFIXES: [&str; 2] = ["KAB. ", "KOTA "];

const SPECIAL_CITIES: [(&str, &str); 5] = [
    ("JAKARTA BARAT", "Jakarta"),
    ("JAKARTA UTARA", "Jakarta"),
    ("JAKARTA SELATAN", "Jakarta"),
    ("JAKARTA TIMUR", "Jakarta"),
    ("JAKARTA PUSAT", "Jakarta"),
];

/// Canonical form of a city name used for equality comparison
pub fn normalize_city_name(name: &str) -> String {
    let titled = to_title_case(name);
    let name = SPECIAL_CITIES
        .iter()
        .find(|(alias, _)| *alias == titled)
        .map_or(name, |(_, canonical)| *canonical);

    let upper = name.to_uppercase();
    for prefix in IGNORED_PREFIXES {
        if let Some(rest) = upper.strip_prefix(prefix) {
            return rest.to_string();
        }
    }
    upper
}

/// Whether two names refer to the same city
pub fn is_same_city(a: &str, b: &str) -> bool {
    normalize_city_name(a) == normalize_city_name(b)
}

/// ID of the first record whose `lokasi` normalises to the same form as `query`.
///
/// When several records collide after normalisation the earliest one in list
/// order wins.
pub fn contains_city<'a>(query: &str, cities: &'a [CityRecord]) -> Option<&'a str> {
    let wanted = normalize_city_name(query);
    cities
        .iter()
        .find(|city| normalize_city_name(&city.lokasi) == wanted)
        .map(|city| city.id.as_str())
}

/// Per-character Unicode title-case mapping
fn to_title_case(s: &str) -> String {
    s.chars().flat_map(title_case_char).collect()
}

fn title_case_char(c: char) -> Vec<char> {
    match c {
        'Ǆ' | 'ǅ' | 'ǆ' => vec!['ǅ'],
        'Ǉ' | 'ǈ' | 'ǉ' => vec!['ǈ'],
        'Ǌ' | 'ǋ' | 'ǌ' => vec!['ǋ'],
        'Ǳ' | 'ǲ' | 'ǳ' => vec!['ǲ'],
        _ => c.to_uppercase().collect(),
    }
}

/// Process-wide city list, fetched on first use and kept for the process lifetime
#[derive(Debug, Default)]
pub struct CityDirectory {
    records: RwLock<Option<Arc<[CityRecord]>>>,
}

impl CityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Known cities, loading them from `provider` if this is the first use.
    ///
    /// An empty list from a successful load is kept as is; only a failed load
    /// leaves the directory unloaded for the next caller to retry.
    pub async fn records(&self, provider: &dyn PrayerTimesProvider) -> Result<Arc<[CityRecord]>> {
        if let Some(records) = self.records.read().await.as_ref() {
            return Ok(Arc::clone(records));
        }

        let response = provider.list_cities().await.inspect_err(|e| {
            warn!("City list load failed: {}", e);
        })?;

        info!("Loaded {} cities from prayer-times provider", response.data.len());
        let records: Arc<[CityRecord]> = response.data.into();
        *self.records.write().await = Some(Arc::clone(&records));
        Ok(records)
    }

    pub async fn is_loaded(&self) -> bool {
        self.records.read().await.is_some()
    }
}
