use clap::{Parser, Subcommand};
use serde::Serialize;

use climate_api_service::app::build_state;
use climate_api_service::config::{Config, DEFAULT_DATABASE_URL};
use climate_api_service::db;

#[derive(Parser)]
#[command(name = "climate-query")]
#[command(about = "Run climate observation queries against a database file", long_about = None)]
struct Cli {
    /// Database connection string
    #[arg(long, env, default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Precipitation keyed by date
    Precipitation,
    /// Station identifiers, or full rows with --details
    Stations {
        #[arg(long)]
        details: bool,
    },
    /// Last year of observations for the most active station
    Tobs,
    /// Observation counts per station, busiest first
    Activity,
    /// Min/avg/max temperature from START, optionally through END
    Summary { start: String, end: Option<String> },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let pool = db::connect(&Config::for_database(cli.database_url)).await?;
    let service = build_state(pool.clone()).climate_service;

    match cli.command {
        Command::Precipitation => print_json(&service.get_precipitation().await?)?,
        Command::Stations { details: false } => print_json(&service.get_stations().await?)?,
        Command::Stations { details: true } => print_json(&service.get_station_details().await?)?,
        Command::Tobs => match service.get_recent_tobs().await? {
            Some(recent) => {
                println!(
                    "Station {} from {} to {} ({} observations)",
                    recent.station,
                    recent.window_start,
                    recent.recent_date,
                    recent.observations.len()
                );
                print_json(&recent.observations)?;
            }
            None => println!("No measurements found"),
        },
        Command::Activity => {
            for row in service.get_station_activity().await? {
                println!("  {}: {} observations", row.station, row.observation_count);
            }
        }
        Command::Summary { start, end } => {
            let summary = service
                .get_date_range_aggregate(&start, end.as_deref())
                .await?;
            println!("{}", summary.describe());
        }
    }

    pool.close().await;
    Ok(())
}
