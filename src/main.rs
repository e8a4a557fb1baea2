use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use climate_api_service::app::Application;
use climate_api_service::config::Config;
use climate_api_service::db;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,climate_api_service=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    info!("Starting climate api service with config: {:?}", config);

    info!("Connecting to database...");
    let pool = db::connect(&config).await?;
    info!("Database connection established");

    let application = Application::build(config, pool.clone()).await?;
    application.run_until_stopped().await?;

    pool.close().await;
    Ok(())
}
