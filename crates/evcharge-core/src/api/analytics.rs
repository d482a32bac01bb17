//! Analytics endpoints: event tracking and aggregate dashboards.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiResult};

/// A company ranked by views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRank {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub bookings: i64,
}

/// A station ranked by bookings. The id is absent when no station exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRank {
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub bookings: i64,
}

/// Company count for one country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountrySlice {
    pub country: Option<String>,
    pub count: i64,
}

/// Station count for one charging type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargingTypeSlice {
    #[serde(rename = "type")]
    pub charging_type: Option<String>,
    pub count: i64,
}

/// Network-wide dashboard aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_bookings: i64,
    pub total_companies: i64,
    pub total_views: i64,
    pub ac_bookings: i64,
    pub dc_bookings: i64,
    pub top_companies: Vec<CompanyRank>,
    pub top_stations: Vec<StationRank>,
    pub country_distribution: Vec<CountrySlice>,
}

/// Aggregates scoped to one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyStats {
    pub total_views: i64,
    pub total_bookings: i64,
    pub top_companies: Vec<CompanyRank>,
    pub country_distribution: Vec<CountrySlice>,
    pub charging_type_distribution: Vec<ChargingTypeSlice>,
}

/// Bookings recorded on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: String,
    pub bookings: i64,
}

/// Acknowledgement of a tracked company view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTracked {
    pub message: String,
    pub views: i64,
}

/// Acknowledgement of a tracked booking event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingTracked {
    pub message: String,
}

/// Booking event details forwarded to analytics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ApiClient {
    /// Records a view against a company and returns the new view count.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn track_view(&self, company_id: i64) -> ApiResult<ViewTracked> {
        self.post_empty(
            &format!("/analytics/track-view/{company_id}"),
            "Failed to track view",
        )
        .await
    }

    /// Records a booking event for analytics.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn track_booking(&self, event: &BookingEvent) -> ApiResult<BookingTracked> {
        self.post_json("/analytics/track-booking", event, "Failed to track booking")
            .await
    }

    /// Fetches the network dashboard for the trailing window in days.
    ///
    /// The server accepts 1 through 365 days.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn dashboard(&self, days: u16) -> ApiResult<DashboardStats> {
        self.get_json_query(
            "/analytics/dashboard",
            &[("days", days.to_string())],
            "Failed to load dashboard",
        )
        .await
    }

    /// Fetches aggregates for one company.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn company_stats(&self, company_id: i64) -> ApiResult<CompanyStats> {
        self.get_json(
            &format!("/analytics/company/{company_id}"),
            "Failed to load company stats",
        )
        .await
    }

    /// Fetches the per-day booking counts.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn bookings_timeline(&self) -> ApiResult<Vec<TimelinePoint>> {
        self.get_json("/analytics/bookings-timeline", "Failed to load timeline")
            .await
    }

    /// Fetches the station with the most bookings.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn most_viewed_station(&self) -> ApiResult<StationRank> {
        self.get_json("/analytics/most-viewed-station", "Failed to load station stats")
            .await
    }
}
