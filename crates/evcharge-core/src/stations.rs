//! Station schema and the directory view-model.
//!
//! Filtering is pure and synchronous: successive narrowing passes over the
//! last-fetched collection, driven by local filter state that is never
//! persisted.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A charging station as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub available_slots: u32,
    /// Open/closed as computed by the server; absent on older payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Distance in km; present only in nearby results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Station {
    /// Returns whether the station counts as open for filtering.
    ///
    /// Only an explicit `is_open == true` counts; an absent flag reads as
    /// closed. Display code wanting the hours fallback uses [`Self::open_at`].
    pub fn is_open_flag(&self) -> bool {
        self.is_open == Some(true)
    }

    /// Returns whether the station is open at the given local time.
    ///
    /// Prefers the server-computed flag; falls back to the opening/closing
    /// window when the flag is absent. Stations with unparseable or missing
    /// hours read as closed.
    pub fn open_at(&self, now: NaiveTime) -> bool {
        if let Some(flag) = self.is_open {
            return flag;
        }
        match (
            parse_clock(self.opening_time.as_deref()),
            parse_clock(self.closing_time.as_deref()),
        ) {
            (Some(open), Some(close)) => now >= open && now <= close,
            _ => false,
        }
    }
}

fn parse_clock(value: Option<&str>) -> Option<NaiveTime> {
    let value = value?;
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Status facet of the station filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("Unknown status filter: {value}")),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Open => write!(f, "open"),
            StatusFilter::Closed => write!(f, "closed"),
        }
    }
}

/// Local filter state for the station directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationFilter {
    /// Substring matched against name or address, case-insensitively.
    pub search: String,
    pub status: StatusFilter,
    /// Minimum free slots; zero disables the pass.
    pub min_available_slots: u32,
}

impl StationFilter {
    /// Returns whether a single station passes every active pass.
    pub fn matches(&self, station: &Station) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let hit = station.name.to_lowercase().contains(&needle)
                || station.address.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        match self.status {
            StatusFilter::All => {}
            StatusFilter::Open => {
                if !station.is_open_flag() {
                    return false;
                }
            }
            StatusFilter::Closed => {
                if station.is_open_flag() {
                    return false;
                }
            }
        }

        if self.min_available_slots > 0 && station.available_slots < self.min_available_slots {
            return false;
        }

        true
    }
}

/// Applies the filter as successive narrowing passes.
///
/// The passes are independent and commutative, so the empty filter is the
/// identity and filtering is idempotent.
pub fn filter(stations: &[Station], criteria: &StationFilter) -> Vec<Station> {
    stations
        .iter()
        .filter(|station| criteria.matches(station))
        .cloned()
        .collect()
}

/// Display aggregates over the station collection.
///
/// Open count and slot total always cover the full unfiltered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectorySummary {
    pub total: usize,
    pub open: usize,
    pub total_available_slots: u64,
    pub matching: usize,
}

/// Counts stations with the open flag set.
pub fn open_count(stations: &[Station]) -> usize {
    stations.iter().filter(|s| s.is_open_flag()).count()
}

/// Sums free slots across the full collection.
pub fn total_available_slots(stations: &[Station]) -> u64 {
    stations.iter().map(|s| u64::from(s.available_slots)).sum()
}

/// Builds the display summary from the full collection and the filtered size.
pub fn summarize(stations: &[Station], matching: usize) -> DirectorySummary {
    DirectorySummary {
        total: stations.len(),
        open: open_count(stations),
        total_available_slots: total_available_slots(stations),
        matching,
    }
}
