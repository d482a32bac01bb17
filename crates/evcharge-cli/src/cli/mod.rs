//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use evcharge_core::api::ApiClient;
use evcharge_core::auth::AuthManager;
use evcharge_core::config::Config;
use evcharge_core::session::SessionStore;
use evcharge_core::stations::StatusFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "evcharge")]
#[command(version)]
#[command(about = "EV charging station locator and booking CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,

        /// Password (read from EVCHARGE_PASSWORD when omitted)
        #[arg(long, env = "EVCHARGE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Print the raw user record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account (three-step OTP flow)
    Register {
        /// Full name (prompted when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Email address (prompted when omitted)
        #[arg(long)]
        email: Option<String>,

        /// 10-digit phone number (prompted when omitted)
        #[arg(long)]
        phone: Option<String>,
    },

    /// Browse charging stations
    Stations {
        #[command(subcommand)]
        command: StationCommands,
    },

    /// Reserve a charging slot
    Book {
        /// Station to book
        #[arg(value_name = "STATION_ID")]
        station_id: i64,

        #[arg(long)]
        name: String,

        /// Vehicle registration number
        #[arg(long)]
        car: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        hours: u32,
    },

    /// List your bookings
    Bookings {
        #[arg(long)]
        json: bool,
    },

    /// Pay for a pending booking
    Pay {
        /// Booking to settle
        #[arg(value_name = "BOOKING_ID")]
        booking_id: i64,

        #[arg(long)]
        json: bool,
    },

    /// Browse charging-network companies
    Companies {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Usage analytics
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommands,
    },

    /// Administrative operations
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum StationCommands {
    /// List stations with optional filters
    List {
        /// Substring matched against name or address
        #[arg(long)]
        search: Option<String>,

        /// Status facet: all, open, or closed
        #[arg(long, value_name = "STATUS", default_value = "all")]
        status: StatusFilter,

        /// Minimum free slots
        #[arg(long, value_name = "N", default_value_t = 0)]
        min_slots: u32,

        #[arg(long)]
        json: bool,
    },

    /// Show one station
    Show {
        #[arg(value_name = "STATION_ID")]
        id: i64,

        #[arg(long)]
        json: bool,
    },

    /// List stations near a position
    Nearby {
        /// Latitude (read from EVCHARGE_LAT when omitted)
        #[arg(long, requires = "lon")]
        lat: Option<f64>,

        /// Longitude (read from EVCHARGE_LON when omitted)
        #[arg(long, requires = "lat")]
        lon: Option<f64>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Subcommand)]
enum CompanyCommands {
    /// List companies, most viewed first
    List {
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Substring matched against company names
        #[arg(long)]
        search: Option<String>,

        /// Rows to skip
        #[arg(long, default_value_t = 0)]
        skip: u32,

        /// Page size
        #[arg(long, default_value_t = 10)]
        limit: u32,

        #[arg(long)]
        json: bool,
    },

    /// Show one company and its stations
    Show {
        #[arg(value_name = "COMPANY_ID")]
        id: i64,

        #[arg(long)]
        json: bool,
    },

    /// Per-company analytics
    Stats {
        #[arg(value_name = "COMPANY_ID")]
        id: i64,

        #[arg(long)]
        json: bool,
    },

    /// Add a company (admin only)
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        website: Option<String>,

        #[arg(long)]
        logo_url: Option<String>,
    },

    /// Update a company (admin only)
    Update {
        #[arg(value_name = "COMPANY_ID")]
        id: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        website: Option<String>,

        #[arg(long)]
        logo_url: Option<String>,
    },

    /// Delete a company (admin only)
    Delete {
        #[arg(value_name = "COMPANY_ID")]
        id: i64,
    },

    /// List countries with registered companies
    Countries,

    /// List company categories
    Categories,

    /// Search companies by name
    Search {
        #[arg(value_name = "QUERY")]
        query: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Subcommand)]
enum AnalyticsCommands {
    /// Network-wide dashboard aggregates
    Dashboard {
        /// Window in days
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u16).range(1..=365))]
        days: u16,

        #[arg(long)]
        json: bool,
    },

    /// Bookings per calendar day
    Timeline {
        #[arg(long)]
        json: bool,
    },

    /// The most booked station
    TopStation {
        #[arg(long)]
        json: bool,
    },

    /// Record a company profile view
    TrackView {
        #[arg(value_name = "COMPANY_ID")]
        company_id: i64,
    },

    /// Record a booking event against a company
    TrackBooking {
        #[arg(long, value_name = "COMPANY_ID")]
        company: Option<i64>,

        #[arg(long, value_name = "STATION_ID")]
        station: Option<i64>,

        /// Charging type (AC or DC)
        #[arg(long, value_name = "TYPE")]
        charging_type: Option<String>,

        #[arg(long)]
        country: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum AdminCommands {
    /// Network-wide counters
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// All bookings, optionally narrowed to one user
    Bookings {
        #[arg(long, value_name = "USER_ID")]
        user: Option<i64>,

        #[arg(long)]
        json: bool,
    },

    /// All recorded payments
    Payments {
        #[arg(long)]
        json: bool,
    },

    /// All registered stations
    Stations {
        #[arg(long)]
        json: bool,
    },

    /// All registered users
    Users {
        #[arg(long)]
        json: bool,
    },

    /// Register a new charging station
    AddStation {
        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        lat: f64,

        #[arg(long)]
        lon: f64,

        #[arg(long)]
        phone: String,

        #[arg(long, value_name = "N", default_value_t = 5)]
        slots: u32,

        /// Opening time (HH:MM)
        #[arg(long, value_name = "TIME")]
        opens: String,

        /// Closing time (HH:MM)
        #[arg(long, value_name = "TIME")]
        closes: String,
    },

    /// Remove a charging station
    DeleteStation {
        #[arg(value_name = "STATION_ID")]
        id: i64,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

/// Logs go to stderr so table and JSON output stay pipeable.
fn init_logging() {
    let filter = EnvFilter::try_from_env("EVCHARGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;
    let base_url = config.resolve_base_url()?;
    let store = SessionStore::open_default();
    let client = ApiClient::new(base_url, store)?;
    let auth = AuthManager::new(client);

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&auth, &email, &password).await
        }
        Commands::Logout => commands::auth::logout(&auth).await,
        Commands::Whoami { json } => commands::auth::whoami(&auth, json).await,
        Commands::Register { name, email, phone } => {
            commands::auth::register(&auth, name, email, phone).await
        }

        Commands::Stations { command } => match command {
            StationCommands::List {
                search,
                status,
                min_slots,
                json,
            } => commands::stations::list(&auth, search, status, min_slots, json).await,
            StationCommands::Show { id, json } => commands::stations::show(&auth, id, json).await,
            StationCommands::Nearby { lat, lon, json } => {
                commands::stations::nearby(&auth, lat, lon, json).await
            }
        },

        Commands::Book {
            station_id,
            name,
            car,
            phone,
            hours,
        } => commands::bookings::book(&auth, station_id, &name, &car, &phone, hours).await,
        Commands::Bookings { json } => commands::bookings::list(&auth, json).await,
        Commands::Pay { booking_id, json } => commands::bookings::pay(&auth, booking_id, json).await,

        Commands::Companies { command } => match command {
            CompanyCommands::List {
                country,
                category,
                search,
                skip,
                limit,
                json,
            } => {
                commands::companies::list(&auth, country, category, search, skip, limit, json).await
            }
            CompanyCommands::Show { id, json } => commands::companies::show(&auth, id, json).await,
            CompanyCommands::Stats { id, json } => commands::companies::stats(&auth, id, json).await,
            CompanyCommands::Add {
                name,
                description,
                country,
                category,
                website,
                logo_url,
            } => {
                let draft = evcharge_core::api::companies::CompanyDraft {
                    name,
                    description,
                    country,
                    category,
                    website,
                    logo_url,
                };
                commands::companies::add(&auth, draft).await
            }
            CompanyCommands::Update {
                id,
                name,
                description,
                country,
                category,
                website,
                logo_url,
            } => {
                let draft = evcharge_core::api::companies::CompanyDraft {
                    name,
                    description,
                    country,
                    category,
                    website,
                    logo_url,
                };
                commands::companies::update(&auth, id, draft).await
            }
            CompanyCommands::Delete { id } => commands::companies::delete(&auth, id).await,
            CompanyCommands::Countries => commands::companies::countries(&auth).await,
            CompanyCommands::Categories => commands::companies::categories(&auth).await,
            CompanyCommands::Search { query, json } => {
                commands::companies::search(&auth, &query, json).await
            }
        },

        Commands::Analytics { command } => match command {
            AnalyticsCommands::Dashboard { days, json } => {
                commands::analytics::dashboard(&auth, days, json).await
            }
            AnalyticsCommands::Timeline { json } => commands::analytics::timeline(&auth, json).await,
            AnalyticsCommands::TopStation { json } => {
                commands::analytics::top_station(&auth, json).await
            }
            AnalyticsCommands::TrackView { company_id } => {
                commands::analytics::track_view(&auth, company_id).await
            }
            AnalyticsCommands::TrackBooking {
                company,
                station,
                charging_type,
                country,
            } => {
                let event = evcharge_core::api::analytics::BookingEvent {
                    company_id: company,
                    station_id: station,
                    charging_type,
                    country,
                };
                commands::analytics::track_booking(&auth, &event).await
            }
        },

        Commands::Admin { command } => match command {
            AdminCommands::Stats { json } => commands::admin::stats(&auth, json).await,
            AdminCommands::Bookings { user, json } => {
                commands::admin::bookings(&auth, user, json).await
            }
            AdminCommands::Payments { json } => commands::admin::payments(&auth, json).await,
            AdminCommands::Stations { json } => commands::admin::stations(&auth, json).await,
            AdminCommands::Users { json } => commands::admin::users(&auth, json).await,
            AdminCommands::AddStation {
                name,
                address,
                lat,
                lon,
                phone,
                slots,
                opens,
                closes,
            } => {
                let draft = evcharge_core::api::admin::StationDraft {
                    name,
                    address,
                    latitude: lat,
                    longitude: lon,
                    phone,
                    available_slots: slots,
                    opening_time: opens,
                    closing_time: closes,
                };
                commands::admin::add_station(&auth, &draft).await
            }
            AdminCommands::DeleteStation { id } => commands::admin::delete_station(&auth, id).await,
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init { force } => commands::config::init(force),
        },
    }
}
