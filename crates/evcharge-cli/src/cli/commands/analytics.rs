//! Analytics command handlers.

use anyhow::Result;
use evcharge_core::api::analytics::BookingEvent;
use evcharge_core::auth::AuthManager;

pub async fn dashboard(auth: &AuthManager, days: u16, json: bool) -> Result<()> {
    super::require_login(auth).await?;
    let stats = auth.client().dashboard(days).await?;
    if json {
        return super::print_json(&stats);
    }

    println!("Last {days} days");
    println!("Total bookings:  {}", stats.total_bookings);
    println!("Total companies: {}", stats.total_companies);
    println!("Total views:     {}", stats.total_views);
    println!("AC bookings:     {}", stats.ac_bookings);
    println!("DC bookings:     {}", stats.dc_bookings);

    if !stats.top_companies.is_empty() {
        let mut table = super::new_table(&["Company", "Views", "Bookings"]);
        for company in &stats.top_companies {
            table.add_row(vec![
                company.name.clone(),
                company.views.to_string(),
                company.bookings.to_string(),
            ]);
        }
        println!("\nTop companies:");
        println!("{table}");
    }

    if !stats.top_stations.is_empty() {
        println!("\nTop stations:");
        for station in &stats.top_stations {
            println!("  {}: {} bookings", station.name, station.bookings);
        }
    }

    if !stats.country_distribution.is_empty() {
        println!("\nCompanies by country:");
        for slice in &stats.country_distribution {
            println!(
                "  {}: {}",
                slice.country.as_deref().unwrap_or("unknown"),
                slice.count
            );
        }
    }
    Ok(())
}

pub async fn timeline(auth: &AuthManager, json: bool) -> Result<()> {
    let points = auth.client().bookings_timeline().await?;
    if json {
        return super::print_json(&points);
    }
    if points.is_empty() {
        println!("No bookings recorded.");
        return Ok(());
    }
    let mut table = super::new_table(&["Date", "Bookings"]);
    for point in &points {
        table.add_row(vec![point.date.clone(), point.bookings.to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub async fn top_station(auth: &AuthManager, json: bool) -> Result<()> {
    let station = auth.client().most_viewed_station().await?;
    if json {
        return super::print_json(&station);
    }
    match station.id {
        Some(id) => println!(
            "{} (#{id}) with {} bookings",
            station.name, station.bookings
        ),
        None => println!("{}", station.name),
    }
    Ok(())
}

pub async fn track_view(auth: &AuthManager, company_id: i64) -> Result<()> {
    let ack = auth.client().track_view(company_id).await?;
    println!("{}. Views: {}", ack.message, ack.views);
    Ok(())
}

pub async fn track_booking(auth: &AuthManager, event: &BookingEvent) -> Result<()> {
    let ack = auth.client().track_booking(event).await?;
    println!("{}", ack.message);
    Ok(())
}
