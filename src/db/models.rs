use serde::Serialize;
use sqlx::FromRow;

// Database entity models
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Station {
    pub id: i64,
    pub station: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

// Projections over `measurement(id, station, date, prcp, tobs)`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PrecipitationRecord {
    pub date: String,
    pub prcp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TemperatureObservation {
    pub station: String,
    pub date: String,
    pub tobs: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct StationActivity {
    pub station: String,
    pub observation_count: i64,
}

/// Result of `MIN/AVG/MAX(tobs)`. SQLite returns a single row of NULLs for an
/// empty selection, so every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromRow, Serialize)]
pub struct TemperatureAggregate {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}
