use sqlx::SqlitePool;
use tracing::{debug, instrument};

use crate::db::{
    DbError, PrecipitationRecord, StationActivity, TemperatureAggregate, TemperatureObservation,
};

/// Read-only queries over the `measurement` table.
///
/// Dates are stored as `YYYY-MM-DD` text, so range filters are plain string
/// comparisons against bound ISO dates.
#[derive(Clone)]
pub struct MeasurementRepository {
    pool: SqlitePool,
}

impl MeasurementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every (date, prcp) pair in table scan order
    #[instrument(skip(self))]
    pub async fn find_precipitation(&self) -> Result<Vec<PrecipitationRecord>, DbError> {
        debug!("Querying precipitation for all measurements");

        let records = sqlx::query_as::<_, PrecipitationRecord>(
            r#"
            SELECT date, prcp
            FROM measurement
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} precipitation records", records.len());
        Ok(records)
    }

    /// Most recent measurement date, or `None` for an empty table
    #[instrument(skip(self))]
    pub async fn find_latest_date(&self) -> Result<Option<String>, DbError> {
        debug!("Querying for latest measurement date");

        let date = sqlx::query_scalar::<_, Option<String>>("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        debug!("Latest measurement date: {:?}", date);
        Ok(date)
    }

    /// Observation counts per station, busiest first.
    ///
    /// Ties on count are ordered by station id so the busiest station is
    /// deterministic.
    #[instrument(skip(self))]
    pub async fn station_activity(&self) -> Result<Vec<StationActivity>, DbError> {
        debug!("Counting measurements per station");

        let activity = sqlx::query_as::<_, StationActivity>(
            r#"
            SELECT station, COUNT(*) AS observation_count
            FROM measurement
            GROUP BY station
            ORDER BY observation_count DESC, station ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Found activity for {} stations", activity.len());
        Ok(activity)
    }

    #[instrument(skip(self))]
    pub async fn find_most_active_station(&self) -> Result<Option<String>, DbError> {
        debug!("Querying for most active station");

        let station = sqlx::query_scalar::<_, String>(
            r#"
            SELECT station
            FROM measurement
            GROUP BY station
            ORDER BY COUNT(*) DESC, station ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        debug!("Most active station: {:?}", station);
        Ok(station)
    }

    /// Temperature observations for one station on or after `since`
    #[instrument(skip(self))]
    pub async fn find_observations_since(
        &self,
        station: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, DbError> {
        debug!("Querying observations for station {} since {}", station, since);

        let observations = sqlx::query_as::<_, TemperatureObservation>(
            r#"
            SELECT station, date, tobs
            FROM measurement
            WHERE station = ?1 AND date >= ?2
            ORDER BY rowid
            "#,
        )
        .bind(station)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} observations", observations.len());
        Ok(observations)
    }

    /// MIN/AVG/MAX of `tobs` for `start <= date [<= end]`
    #[instrument(skip(self))]
    pub async fn aggregate_temperatures(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureAggregate, DbError> {
        debug!("Aggregating temperatures from {} to {:?}", start, end);

        let aggregate = sqlx::query_as::<_, TemperatureAggregate>(
            r#"
            SELECT MIN(tobs) AS min, AVG(tobs) AS avg, MAX(tobs) AS max
            FROM measurement
            WHERE date >= ?1 AND (?2 IS NULL OR date <= ?2)
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(aggregate)
    }
}
