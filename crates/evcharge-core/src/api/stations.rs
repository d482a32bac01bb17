//! Station endpoints: listing, detail, and nearby lookup.

use serde::Serialize;

use crate::api::{ApiClient, ApiResult};
use crate::geo::GeoPosition;
use crate::stations::Station;

#[derive(Debug, Serialize)]
struct NearbyRequest {
    lat: f64,
    lon: f64,
}

impl ApiClient {
    /// Fetches every charging station.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn list_stations(&self) -> ApiResult<Vec<Station>> {
        self.get_json("/stations/", "Failed to load stations").await
    }

    /// Fetches one station by id.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn station(&self, id: i64) -> ApiResult<Station> {
        self.get_json(&format!("/stations/{id}"), "Failed to load station details")
            .await
    }

    /// Fetches stations within range of a position, nearest first.
    ///
    /// Each returned station carries a `distance` in kilometres.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn nearby_stations(&self, position: GeoPosition) -> ApiResult<Vec<Station>> {
        let body = NearbyRequest {
            lat: position.latitude,
            lon: position.longitude,
        };
        self.post_json("/stations/nearby", &body, "Failed to fetch nearby stations.")
            .await
    }
}
