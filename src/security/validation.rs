use crate::error::{GatewayError, Result};
use crate::server::SearchRequest;
use crate::upstream::PlaceQuery;

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MAX_LIMIT: i64 = 50;

#[derive(Debug, Clone, Default)]
pub struct InputValidator;

impl InputValidator {
    /// Check a search request field by field and turn it into an upstream query.
    ///
    /// Fields are checked in the order latitude, longitude, radius, limit and
    /// only the first violation is reported.
    pub fn validate_search(&self, request: &SearchRequest) -> Result<PlaceQuery> {
        if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&request.latitude) {
            return Err(GatewayError::bad_request("Invalid latitude"));
        }

        if !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&request.longitude) {
            return Err(GatewayError::bad_request("Invalid longitude"));
        }

        if request.radius <= 0 {
            return Err(GatewayError::bad_request("Invalid radius"));
        }

        if !(1..=MAX_LIMIT).contains(&request.limit) {
            return Err(GatewayError::bad_request("Invalid limit"));
        }

        Ok(PlaceQuery {
            latitude: request.latitude,
            longitude: request.longitude,
            radius: request.radius,
            limit: request.limit,
        })
    }

    /// A required, non-empty query parameter
    pub fn require_param<'a>(&self, name: &str, value: Option<&'a str>) -> Result<&'a str> {
        match value {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(GatewayError::bad_request(format!(
                "Query parameter '{}' is required",
                name
            ))),
        }
    }
}
