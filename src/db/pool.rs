use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::db::DbError;

/// Open a read-only connection pool over the observation database.
///
/// The service never writes, so the file is opened with `SQLITE_OPEN_READONLY`
/// and a missing file is an error rather than an empty new database.
#[instrument(skip(config), fields(database_url = %config.database_url))]
pub async fn connect(config: &Config) -> Result<SqlitePool, DbError> {
    debug!(
        "Opening read-only pool (max_connections={}, acquire_timeout={}s)",
        config.db_max_connections, config.db_acquire_timeout_secs
    );

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .read_only(true)
        .create_if_missing(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect_with(options)
        .await?;

    info!("Database pool ready");
    Ok(pool)
}
