use sqlx::SqlitePool;
use tracing::{debug, instrument};

use crate::db::{DbError, Station};

#[derive(Clone)]
pub struct StationRepository {
    pool: SqlitePool,
}

impl StationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All station identifiers in table scan order
    #[instrument(skip(self))]
    pub async fn find_all_ids(&self) -> Result<Vec<String>, DbError> {
        debug!("Querying station identifiers");

        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT station
            FROM station
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} stations", ids.len());
        Ok(ids)
    }

    /// Full station rows including location metadata
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Station>, DbError> {
        debug!("Querying station metadata");

        let stations = sqlx::query_as::<_, Station>(
            r#"
            SELECT id, station, name, latitude, longitude, elevation
            FROM station
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} stations", stations.len());
        Ok(stations)
    }

    /// Round-trip to the store, used by the health endpoint
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
