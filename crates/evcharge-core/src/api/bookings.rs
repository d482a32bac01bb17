//! Booking endpoints: slot reservation and booking lists.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiResult};

/// Flat rate charged per booked hour.
pub const RATE_PER_HOUR: i64 = 60;

/// Request body for reserving a charging slot.
#[derive(Debug, Clone, Serialize)]
pub struct BookingRequest {
    pub station_id: i64,
    pub user_id: i64,
    pub name: String,
    pub car_number: String,
    pub phone: String,
    pub hours: u32,
}

/// A confirmed booking as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub station_id: i64,
    pub name: String,
    pub car_number: String,
    pub phone: String,
    pub hours: u32,
    pub status: String,
}

impl Booking {
    /// Amount due for this booking at the flat hourly rate.
    pub fn amount(&self) -> i64 {
        i64::from(self.hours) * RATE_PER_HOUR
    }
}

impl ApiClient {
    /// Reserves a charging slot and returns the pending booking.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn create_booking(&self, request: &BookingRequest) -> ApiResult<Booking> {
        self.post_json("/bookings/", request, "Booking failed").await
    }

    /// Lists every booking in the system.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn list_bookings(&self) -> ApiResult<Vec<Booking>> {
        self.get_json("/bookings/", "Failed to load bookings").await
    }
}
