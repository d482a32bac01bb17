//! Company command handlers.

use anyhow::Result;
use evcharge_core::api::companies::{CompanyDraft, CompanyQuery};
use evcharge_core::auth::AuthManager;

pub async fn list(
    auth: &AuthManager,
    country: Option<String>,
    category: Option<String>,
    search: Option<String>,
    skip: u32,
    limit: u32,
    json: bool,
) -> Result<()> {
    let query = CompanyQuery {
        skip,
        limit,
        country,
        category,
        search,
    };
    let companies = auth.client().list_companies(&query).await?;
    if json {
        return super::print_json(&companies);
    }
    if companies.is_empty() {
        println!("No companies found.");
        return Ok(());
    }

    let mut table = super::new_table(&["ID", "Name", "Country", "Category", "Views", "Bookings"]);
    for company in &companies {
        table.add_row(vec![
            company.id.to_string(),
            company.name.clone(),
            super::or_dash(company.country.as_deref()),
            super::or_dash(company.category.as_deref()),
            company.views.to_string(),
            company.bookings_count.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn show(auth: &AuthManager, id: i64, json: bool) -> Result<()> {
    let client = auth.client();
    let company = client.company(id).await?;

    // Opening a profile counts as a view; tracking failures only log.
    if let Err(err) = client.track_view(id).await {
        tracing::debug!("failed to track view for company {id}: {err}");
    }

    if json {
        return super::print_json(&company);
    }

    println!("{} (#{})", company.name, company.id);
    if let Some(category) = &company.category {
        println!("Category: {category}");
    }
    if let Some(country) = &company.country {
        println!("Country: {country}");
    }
    if let Some(link) = company.link() {
        println!("Website: {link}");
    }
    if let Some(description) = &company.description {
        println!("\n{description}");
    }
    println!("\nViews: {}  Bookings: {}", company.views, company.bookings_count);

    match client.company_stations(id).await {
        Ok(listing) if listing.stations.is_empty() => println!("\nNo stations registered."),
        Ok(listing) => {
            let mut table = super::new_table(&["ID", "Name", "Address", "Type", "Slots"]);
            for station in &listing.stations {
                table.add_row(vec![
                    station.id.to_string(),
                    station.name.clone(),
                    station.address.clone(),
                    super::or_dash(station.charging_type.as_deref()),
                    station.available_slots.to_string(),
                ]);
            }
            println!("\nStations ({}):", listing.station_count);
            println!("{table}");
        }
        Err(err) => tracing::debug!("failed to load stations for company {id}: {err}"),
    }
    Ok(())
}

pub async fn stats(auth: &AuthManager, id: i64, json: bool) -> Result<()> {
    let stats = auth.client().company_stats(id).await?;
    if json {
        return super::print_json(&stats);
    }
    println!("Views: {}", stats.total_views);
    println!("Bookings: {}", stats.total_bookings);
    if !stats.charging_type_distribution.is_empty() {
        println!("\nBy charging type:");
        for slice in &stats.charging_type_distribution {
            println!(
                "  {}: {}",
                slice.charging_type.as_deref().unwrap_or("unknown"),
                slice.count
            );
        }
    }
    if !stats.country_distribution.is_empty() {
        println!("\nBy country:");
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

pub async fn add(auth: &AuthManager, draft: CompanyDraft) -> Result<()> {
    super::require_admin(auth, "Only admins can add companies").await?;
    let company = auth.client().create_company(&draft).await?;
    println!("Company added successfully!");
    println!("ID: {}", company.id);
    Ok(())
}

pub async fn update(auth: &AuthManager, id: i64, draft: CompanyDraft) -> Result<()> {
    super::require_admin(auth, "Only admins can edit companies").await?;
    let company = auth.client().update_company(id, &draft).await?;
    println!("Updated company #{}.", company.id);
    Ok(())
}

pub async fn delete(auth: &AuthManager, id: i64) -> Result<()> {
    super::require_admin(auth, "Only admins can delete companies").await?;
    auth.client().delete_company(id).await?;
    println!("Deleted company #{id}.");
    Ok(())
}

pub async fn countries(auth: &AuthManager) -> Result<()> {
    let countries = auth.client().company_countries().await?;
    if countries.is_empty() {
        println!("No countries recorded.");
        return Ok(());
    }
    for country in countries {
        println!("{country}");
    }
    Ok(())
}

pub async fn categories(auth: &AuthManager) -> Result<()> {
    let categories = auth.client().company_categories().await?;
    if categories.is_empty() {
        println!("No categories recorded.");
        return Ok(());
    }
    for category in categories {
        println!("{category}");
    }
    Ok(())
}

pub async fn search(auth: &AuthManager, query: &str, json: bool) -> Result<()> {
    let results = auth.client().search_companies(query).await?;
    if json {
        return super::print_json(&results);
    }
    if results.results.is_empty() {
        println!("No matches for \"{}\".", results.query);
        return Ok(());
    }

    let mut table = super::new_table(&["ID", "Name", "Country", "Category", "Views"]);
    for hit in &results.results {
        table.add_row(vec![
            hit.id.to_string(),
            hit.name.clone(),
            super::or_dash(hit.country.as_deref()),
            super::or_dash(hit.category.as_deref()),
            hit.views.to_string(),
        ]);
    }
    println!("{table}");
    println!("{} results for \"{}\".", results.results_count, results.query);
    Ok(())
}
