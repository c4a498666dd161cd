use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toolroom::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toolroom=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize database
    let db = match db::init_db(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database {}: {}", config.database_url, e);
            std::process::exit(1);
        }
    };

    if config.seed_defaults {
        tracing::info!("Seeding default accounts and catalogue...");
        if let Err(e) = seed::seed_defaults(&db, &config.default_staff_password).await {
            tracing::error!("Failed to seed defaults: {}", e);
        }
    }

    if let Err(e) = server::run(&config, db).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
