//! Station command handlers.

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use evcharge_core::auth::AuthManager;
use evcharge_core::geo::{self, EnvPositionProvider, GeoPosition};
use evcharge_core::stations::{self, Station, StationFilter, StatusFilter};

/// Longest wait for a position fix before giving up.
const LOCATION_WAIT: Duration = Duration::from_secs(10);

pub async fn list(
    auth: &AuthManager,
    search: Option<String>,
    status: StatusFilter,
    min_slots: u32,
    json: bool,
) -> Result<()> {
    let all = auth.client().list_stations().await?;
    let criteria = StationFilter {
        search: search.unwrap_or_default(),
        status,
        min_available_slots: min_slots,
    };
    let matching = stations::filter(&all, &criteria);

    if json {
        return super::print_json(&matching);
    }

    let summary = stations::summarize(&all, matching.len());
    if matching.is_empty() {
        println!("No stations match the current filters.");
    } else {
        let mut table = super::new_table(&["ID", "Name", "Address", "Slots", "Status", "Hours"]);
        for station in &matching {
            table.add_row(vec![
                station.id.to_string(),
                station.name.clone(),
                station.address.clone(),
                station.available_slots.to_string(),
                status_label(station).to_string(),
                hours_label(station),
            ]);
        }
        println!("{table}");
    }
    println!(
        "Showing {} of {} stations. Active now: {}. Total slots: {}.",
        summary.matching, summary.total, summary.open, summary.total_available_slots
    );
    Ok(())
}

pub async fn show(auth: &AuthManager, id: i64, json: bool) -> Result<()> {
    let station = auth.client().station(id).await?;
    if json {
        return super::print_json(&station);
    }
    println!("{} (#{})", station.name, station.id);
    println!("Address: {}", station.address);
    if let Some(phone) = &station.phone {
        println!("Phone: {phone}");
    }
    println!("Slots: {}", station.available_slots);
    // Unlike the listing, the detail view falls back to the posted hours
    // when the server omits the open flag.
    let open = station.open_at(Local::now().time());
    println!("Status: {}", if open { "open" } else { "closed" });
    let hours = hours_label(&station);
    if hours != "-" {
        println!("Hours: {hours}");
    }
    Ok(())
}

pub async fn nearby(
    auth: &AuthManager,
    lat: Option<f64>,
    lon: Option<f64>,
    json: bool,
) -> Result<()> {
    let position = match (lat, lon) {
        (Some(latitude), Some(longitude)) => GeoPosition {
            latitude,
            longitude,
        },
        _ => geo::locate(&EnvPositionProvider::new(), LOCATION_WAIT).await?,
    };

    let nearby = auth.client().nearby_stations(position).await?;
    if json {
        return super::print_json(&nearby);
    }
    if nearby.is_empty() {
        println!("No stations nearby.");
        return Ok(());
    }
    for station in &nearby {
        match station.distance {
            Some(km) => println!("{}  {}  {km:.2} km away", station.name, station.address),
            None => println!("{}  {}", station.name, station.address),
        }
    }
    Ok(())
}

fn status_label(station: &Station) -> &'static str {
    match station.is_open {
        Some(true) => "open",
        Some(false) => "closed",
        None => "-",
    }
}

fn hours_label(station: &Station) -> String {
    match (&station.opening_time, &station.closing_time) {
        (Some(open), Some(close)) => format!("{open} - {close}"),
        _ => "-".to_string(),
    }
}
