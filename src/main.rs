use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medidesk::infrastructure::AppState;
use medidesk::{config, db, seed, server};

/// MediDesk hospital and pharmacy backend
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Profile name, selects the database file
    #[arg(long)]
    profile: Option<String>,
    /// Preferred port; the next free one is used when taken
    #[arg(long)]
    port: Option<u16>,
    /// Load demo data into an empty database
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medidesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = config::Config::from_env();
    if let Some(profile) = cli.profile {
        config = config.with_profile(profile);
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    // Initialize database
    let db = match db::init_db(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database {}: {}", config.database_url, e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(db).with_working_days(config.working_days_per_month);

    if cli.seed || config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&state).await {
            tracing::error!("Failed to seed data: {}", e);
        } else {
            tracing::info!("Demo data seeded successfully.");
        }
    }

    let app = server::build_router(state, &config.cors_allowed_origins);

    // Find available port
    let Some(port) = server::find_available_port(config.port) else {
        tracing::error!("No free port found from {}", config.port);
        std::process::exit(1);
    };
    if port != config.port {
        tracing::warn!(
            "Preferred port {} was not available, using port {} instead",
            config.port,
            port
        );
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("MediDesk server listening on {} (profile '{}')", addr, config.profile);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
