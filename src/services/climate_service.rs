use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::dates;
use crate::db::{
    MeasurementRepository, PrecipitationRecord, Station, StationActivity, StationRepository,
    TemperatureAggregate, TemperatureObservation,
};
use crate::services::ServiceError;

/// One scalar of the flattened observation list: station id, date or reading
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ObservationField {
    Text(String),
    Number(f64),
}

/// Trailing-year temperature observations of the busiest station
#[derive(Debug, Clone)]
pub struct RecentTemperatures {
    pub station: String,
    pub recent_date: NaiveDate,
    pub window_start: NaiveDate,
    pub observations: Vec<TemperatureObservation>,
}

impl RecentTemperatures {
    /// Wire shape: `[station, date, tobs, station, date, tobs, ...]`
    pub fn flatten(&self) -> Vec<ObservationField> {
        self.observations
            .iter()
            .flat_map(|o| {
                [
                    ObservationField::Text(o.station.clone()),
                    ObservationField::Text(o.date.clone()),
                    ObservationField::Number(o.tobs),
                ]
            })
            .collect()
    }
}

/// Min/avg/max temperature over a date range. Fields are `None` when no
/// measurement falls in the range.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSummary {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureSummary {
    /// Human readable sentence returned by the date range endpoints
    pub fn describe(&self) -> String {
        let mut text = format!("Start Date: {}, ", dates::echo_timestamp(self.start));
        if let Some(end) = self.end {
            text.push_str(&format!("End Date: {}, ", dates::echo_timestamp(end)));
        }
        text.push_str(&format!(
            "Minimum Temp is {}, Average Temp is {}, Max Temp is {}",
            format_temperature(self.min),
            format_temperature(self.avg),
            format_temperature(self.max)
        ));
        text
    }
}

// Shortest round-trip form, keeping ".0" on whole numbers
fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "None".to_string(),
    }
}

#[derive(Clone)]
pub struct ClimateService {
    measurement_repo: MeasurementRepository,
    station_repo: StationRepository,
}

impl ClimateService {
    pub fn new(measurement_repo: MeasurementRepository, station_repo: StationRepository) -> Self {
        Self {
            measurement_repo,
            station_repo,
        }
    }

    /// Precipitation keyed by date.
    ///
    /// Stations reporting on the same date overwrite each other: the value
    /// kept is the one from the last row scanned for that date.
    #[instrument(skip(self))]
    pub async fn get_precipitation(&self) -> Result<BTreeMap<String, Option<f64>>, ServiceError> {
        let records = self.measurement_repo.find_precipitation().await?;
        let by_date = Self::collapse_by_date(records);
        info!("Collapsed precipitation into {} dates", by_date.len());
        Ok(by_date)
    }

    #[instrument(skip(self))]
    pub async fn get_stations(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.station_repo.find_all_ids().await?)
    }

    #[instrument(skip(self))]
    pub async fn get_station_details(&self) -> Result<Vec<Station>, ServiceError> {
        Ok(self.station_repo.find_all().await?)
    }

    #[instrument(skip(self))]
    pub async fn get_station_activity(&self) -> Result<Vec<StationActivity>, ServiceError> {
        Ok(self.measurement_repo.station_activity().await?)
    }

    /// Observations of the most active station within 365 days of the most
    /// recent measurement. `None` when the measurement table is empty.
    #[instrument(skip(self))]
    pub async fn get_recent_tobs(&self) -> Result<Option<RecentTemperatures>, ServiceError> {
        let Some(latest) = self.measurement_repo.find_latest_date().await? else {
            warn!("No measurements found, nothing to report");
            return Ok(None);
        };

        let recent_date =
            dates::parse_iso_date(&latest).map_err(|source| ServiceError::MalformedStoredDate {
                value: latest.clone(),
                source,
            })?;
        let window_start = dates::trailing_year_start(recent_date);

        let Some(station) = self.measurement_repo.find_most_active_station().await? else {
            return Ok(None);
        };
        debug!(
            "Most active station {} with window {} to {}",
            station, window_start, recent_date
        );

        let observations = self
            .measurement_repo
            .find_observations_since(&station, &dates::to_iso(window_start))
            .await?;

        info!(
            "Retrieved {} observations for station {} since {}",
            observations.len(),
            station,
            window_start
        );

        Ok(Some(RecentTemperatures {
            station,
            recent_date,
            window_start,
            observations,
        }))
    }

    /// Min/avg/max temperature for `start <= date`, bounded by `end` when given.
    ///
    /// `start > end` is not rejected; it matches nothing and yields `None`s.
    #[instrument(skip(self))]
    pub async fn get_date_range_aggregate(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureSummary, ServiceError> {
        let start = Self::parse_date(start)?;
        let end = end.map(Self::parse_date).transpose()?;

        let end_iso = end.map(dates::to_iso);
        let aggregate = self
            .measurement_repo
            .aggregate_temperatures(&dates::to_iso(start), end_iso.as_deref())
            .await?;

        if aggregate.avg.is_none() {
            debug!("No measurements between {} and {:?}", start, end);
        }

        let TemperatureAggregate { min, avg, max } = Self::bound_average(aggregate);
        Ok(TemperatureSummary {
            start,
            end,
            min,
            avg,
            max,
        })
    }

    /// Liveness check against the store
    pub async fn check_health(&self) -> Result<(), ServiceError> {
        Ok(self.station_repo.ping().await?)
    }

    // Business logic helpers (private)

    fn parse_date(value: &str) -> Result<NaiveDate, ServiceError> {
        dates::parse_iso_date(value).map_err(|source| ServiceError::InvalidDateFormat {
            value: value.to_string(),
            source,
        })
    }

    fn collapse_by_date(records: Vec<PrecipitationRecord>) -> BTreeMap<String, Option<f64>> {
        let mut by_date = BTreeMap::new();
        for record in records {
            by_date.insert(record.date, record.prcp);
        }
        by_date
    }

    /// Float summation can leave the mean a rounding step outside [min, max]
    fn bound_average(aggregate: TemperatureAggregate) -> TemperatureAggregate {
        let avg = match (aggregate.min, aggregate.avg, aggregate.max) {
            (Some(min), Some(avg), Some(max)) if min <= max => Some(avg.clamp(min, max)),
            (_, avg, _) => avg,
        };
        TemperatureAggregate { avg, ..aggregate }
    }
}
