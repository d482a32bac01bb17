//! Booking command handlers: reserve, list, and pay.

use anyhow::{Context, Result, bail};
use evcharge_core::api::bookings::BookingRequest;
use evcharge_core::auth::AuthManager;

pub async fn book(
    auth: &AuthManager,
    station_id: i64,
    name: &str,
    car: &str,
    phone: &str,
    hours: u32,
) -> Result<()> {
    let Some(user) = auth.current_user().await else {
        bail!("Please login first to book a slot");
    };

    let request = BookingRequest {
        station_id,
        user_id: user.id,
        name: name.to_string(),
        car_number: car.to_string(),
        phone: phone.to_string(),
        hours,
    };
    let booking = auth.client().create_booking(&request).await?;
    println!(
        "Booking #{} confirmed for {} hours. Amount due: ₹{}.",
        booking.id,
        booking.hours,
        booking.amount()
    );
    println!("Run `evcharge pay {}` to settle it.", booking.id);
    Ok(())
}

pub async fn list(auth: &AuthManager, json: bool) -> Result<()> {
    super::require_login(auth).await?;
    let user = auth.current_user().await.context("read current user")?;

    let bookings = auth.client().admin_bookings(Some(user.id)).await?;
    if json {
        return super::print_json(&bookings);
    }
    if bookings.is_empty() {
        println!("No bookings yet.");
        return Ok(());
    }

    let mut table = super::new_table(&["ID", "Station", "Car", "Hours", "Amount", "Status"]);
    for booking in &bookings {
        table.add_row(vec![
            booking.id.to_string(),
            booking
                .station_id
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            super::or_dash(booking.car_number.as_deref()),
            booking
                .hours
                .map_or_else(|| "-".to_string(), |hours| hours.to_string()),
            booking
                .amount
                .map_or_else(|| "-".to_string(), |amount| format!("₹{amount}")),
            super::or_dash(booking.status.as_deref()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn pay(auth: &AuthManager, booking_id: i64, json: bool) -> Result<()> {
    super::require_login(auth).await?;

    let bookings = auth.client().list_bookings().await?;
    let Some(booking) = bookings.into_iter().find(|b| b.id == booking_id) else {
        bail!("No booking found. Please book a slot first.");
    };

    let receipt = auth.client().pay_for_booking(&booking).await?;
    if json {
        return super::print_json(&receipt);
    }
    println!(
        "Payment of ₹{} recorded for booking #{}.",
        receipt.amount, receipt.booking_id
    );
    Ok(())
}
