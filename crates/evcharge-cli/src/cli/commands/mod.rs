//! CLI command handlers.

use anyhow::{Context, Result, bail};
use comfy_table::{ContentArrangement, Table};
use evcharge_core::auth::AuthManager;
use evcharge_core::guard::GuardOutcome;

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod companies;
pub mod config;
pub mod stations;

/// Stops commands that need a signed-in user.
pub(crate) async fn require_login(auth: &AuthManager) -> Result<()> {
    require(auth, None, "Please login first").await
}

/// Stops commands that need the admin flag, with a command-specific
/// denial message.
pub(crate) async fn require_admin(auth: &AuthManager, denied: &str) -> Result<()> {
    require(auth, Some("admin"), denied).await
}

async fn require(auth: &AuthManager, role: Option<&str>, denied: &str) -> Result<()> {
    match auth.guard(role).await {
        GuardOutcome::Allow => Ok(()),
        GuardOutcome::RedirectLogin => bail!("Please login first"),
        GuardOutcome::RedirectHome => bail!("{denied}"),
    }
}

pub(crate) fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
