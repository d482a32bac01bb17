//! Admin command handlers. Every operation is gated on the admin flag.

use anyhow::Result;
use evcharge_core::api::admin::StationDraft;
use evcharge_core::auth::AuthManager;

const DENIED: &str = "Only admins can use this command";

pub async fn stats(auth: &AuthManager, json: bool) -> Result<()> {
    super::require_admin(auth, DENIED).await?;
    let stats = auth.client().admin_stats().await?;
    if json {
        return super::print_json(&stats);
    }
    println!("Stations:         {}", stats.stations);
    println!("Total bookings:   {}", stats.total_bookings);
    println!("Paid bookings:    {}", stats.paid_bookings);
    println!("Pending bookings: {}", stats.pending_bookings);
    Ok(())
}

pub async fn bookings(auth: &AuthManager, user: Option<i64>, json: bool) -> Result<()> {
    super::require_admin(auth, DENIED).await?;
    let bookings = auth.client().admin_bookings(user).await?;
    if json {
        return super::print_json(&bookings);
    }
    if bookings.is_empty() {
        println!("No bookings found.");
        return Ok(());
    }

    let mut table = super::new_table(&[
        "ID", "Station", "Phone", "Car", "Hours", "Amount", "Status", "Date",
    ]);
    for booking in &bookings {
        table.add_row(vec![
            booking.id.to_string(),
            booking
                .station_id
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            super::or_dash(booking.phone.as_deref()),
            super::or_dash(booking.car_number.as_deref()),
            booking
                .hours
                .map_or_else(|| "-".to_string(), |hours| hours.to_string()),
            booking
                .amount
                .map_or_else(|| "-".to_string(), |amount| format!("₹{amount}")),
            super::or_dash(booking.status.as_deref()),
            super::or_dash(booking.date.as_deref()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn payments(auth: &AuthManager, json: bool) -> Result<()> {
    super::require_admin(auth, DENIED).await?;
    let payments = auth.client().admin_payments().await?;
    if json {
        return super::print_json(&payments);
    }
    if payments.is_empty() {
        println!("No payments recorded.");
        return Ok(());
    }

    let mut table = super::new_table(&["ID", "Booking", "Phone", "Car", "Amount", "Timestamp"]);
    for payment in &payments {
        table.add_row(vec![
            payment.id.to_string(),
            payment
                .booking_id
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            super::or_dash(payment.phone.as_deref()),
            super::or_dash(payment.car_number.as_deref()),
            payment
                .amount
                .map_or_else(|| "-".to_string(), |amount| format!("₹{amount}")),
            super::or_dash(payment.timestamp.as_deref()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn stations(auth: &AuthManager, json: bool) -> Result<()> {
    super::require_admin(auth, DENIED).await?;
    let stations = auth.client().admin_stations().await?;
    if json {
        return super::print_json(&stations);
    }
    if stations.is_empty() {
        println!("No stations registered.");
        return Ok(());
    }

    let mut table = super::new_table(&["ID", "Name", "Address", "Phone", "Slots"]);
    for station in &stations {
        table.add_row(vec![
            station.id.to_string(),
            station.name.clone(),
            station.address.clone(),
            super::or_dash(station.phone.as_deref()),
            station.available_slots.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn users(auth: &AuthManager, json: bool) -> Result<()> {
    super::require_admin(auth, DENIED).await?;
    let users = auth.client().list_users().await?;
    if json {
        return super::print_json(&users);
    }
    if users.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    let mut table = super::new_table(&["ID", "Name", "Email", "Phone", "Role", "Admin"]);
    for user in &users {
        table.add_row(vec![
            user.id.to_string(),
            user.name.clone(),
            user.email.clone(),
            super::or_dash(user.phone.as_deref()),
            user.effective_role().to_string(),
            if user.is_admin { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn add_station(auth: &AuthManager, draft: &StationDraft) -> Result<()> {
    super::require_admin(auth, DENIED).await?;
    let station = auth.client().add_station(draft).await?;
    println!("Station #{} registered: {}", station.id, station.name);
    Ok(())
}

pub async fn delete_station(auth: &AuthManager, id: i64) -> Result<()> {
    super::require_admin(auth, DENIED).await?;
    auth.client().delete_station(id).await?;
    println!("Deleted station #{id}.");
    Ok(())
}
