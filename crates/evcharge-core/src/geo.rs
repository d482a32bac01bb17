//! Position lookup for the nearby-stations flow.
//!
//! Mirrors the fire-and-suspend shape of a browser geolocation query: one
//! bounded wait, no retry, and a distinguishable outcome for permission
//! denial, unavailability, and timeout.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A resolved position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcomes of a failed position lookup, each with a distinct message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    PermissionDenied,
    PositionUnavailable,
    TimedOut,
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::PermissionDenied => write!(f, "Location permission denied"),
            GeoError::PositionUnavailable => write!(f, "Location is unavailable"),
            GeoError::TimedOut => write!(f, "Timed out waiting for a location fix"),
        }
    }
}

impl std::error::Error for GeoError {}

/// Source of position fixes.
///
/// Front ends with a prompting location service implement this; the CLI
/// default reads coordinates from the environment.
pub trait PositionProvider {
    fn current_position(&self) -> impl Future<Output = Result<GeoPosition, GeoError>> + Send;
}

/// Resolves a position with a bounded wait.
///
/// # Errors
/// Returns the provider's error, or [`GeoError::TimedOut`] when the wait
/// expires first.
pub async fn locate<P: PositionProvider>(
    provider: &P,
    wait: Duration,
) -> Result<GeoPosition, GeoError> {
    match tokio::time::timeout(wait, provider.current_position()).await {
        Ok(result) => result,
        Err(_) => Err(GeoError::TimedOut),
    }
}

/// Position provider backed by environment variables.
///
/// Absent or unparseable coordinates map to
/// [`GeoError::PositionUnavailable`], the closest analog to a platform
/// without a location service.
#[derive(Debug, Clone)]
pub struct EnvPositionProvider {
    lat_var: String,
    lon_var: String,
}

impl EnvPositionProvider {
    /// Environment variable holding the latitude.
    pub const LAT_VAR: &str = "EVCHARGE_LAT";
    /// Environment variable holding the longitude.
    pub const LON_VAR: &str = "EVCHARGE_LON";

    pub fn new() -> Self {
        Self::from_vars(Self::LAT_VAR, Self::LON_VAR)
    }

    /// Creates a provider reading from explicit variable names.
    pub fn from_vars(lat_var: impl Into<String>, lon_var: impl Into<String>) -> Self {
        Self {
            lat_var: lat_var.into(),
            lon_var: lon_var.into(),
        }
    }

    fn read_coord(var: &str) -> Result<f64, GeoError> {
        std::env::var(var)
            .ok()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .ok_or(GeoError::PositionUnavailable)
    }
}

impl Default for EnvPositionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionProvider for EnvPositionProvider {
    async fn current_position(&self) -> Result<GeoPosition, GeoError> {
        Ok(GeoPosition {
            latitude: Self::read_coord(&self.lat_var)?,
            longitude: Self::read_coord(&self.lon_var)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(GeoPosition);

    impl PositionProvider for FixedProvider {
        async fn current_position(&self) -> Result<GeoPosition, GeoError> {
            Ok(self.0)
        }
    }

    struct StalledProvider;

    impl PositionProvider for StalledProvider {
        async fn current_position(&self) -> Result<GeoPosition, GeoError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(GeoError::PositionUnavailable)
        }
    }

    struct DeniedProvider;

    impl PositionProvider for DeniedProvider {
        async fn current_position(&self) -> Result<GeoPosition, GeoError> {
            Err(GeoError::PermissionDenied)
        }
    }

    /// Test: a resolved fix passes through within the wait.
    #[tokio::test]
    async fn test_locate_resolves() {
        let provider = FixedProvider(GeoPosition {
            latitude: 12.97,
            longitude: 77.59,
        });
        let fix = locate(&provider, Duration::from_secs(5)).await.unwrap();
        assert!((fix.latitude - 12.97).abs() < f64::EPSILON);
    }

    /// Test: an expired wait maps to the timed-out outcome.
    #[tokio::test(start_paused = true)]
    async fn test_locate_times_out() {
        let err = locate(&StalledProvider, Duration::from_secs(10))
            .await
            .unwrap_err();
        assert_eq!(err, GeoError::TimedOut);
    }

    /// Test: permission denial is surfaced unchanged.
    #[tokio::test]
    async fn test_locate_permission_denied() {
        let err = locate(&DeniedProvider, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err, GeoError::PermissionDenied);
    }

    /// Test: unset environment coordinates read as unavailable.
    #[tokio::test]
    async fn test_env_provider_unset_is_unavailable() {
        let provider =
            EnvPositionProvider::from_vars("EVCHARGE_TEST_NO_LAT", "EVCHARGE_TEST_NO_LON");
        let err = locate(&provider, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err, GeoError::PositionUnavailable);
    }

    /// Test: the three outcomes carry distinct messages.
    #[test]
    fn test_distinct_messages() {
        let messages = [
            GeoError::PermissionDenied.to_string(),
            GeoError::PositionUnavailable.to_string(),
            GeoError::TimedOut.to_string(),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }
}
