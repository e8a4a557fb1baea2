#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::time::Duration;

/// (station, date, prcp, tobs)
pub type MeasurementRow<'a> = (&'a str, &'a str, Option<f64>, f64);

pub const SCHEMA: &str = r#"
    CREATE TABLE measurement (
        id INTEGER PRIMARY KEY,
        station TEXT,
        date TEXT,
        prcp FLOAT,
        tobs FLOAT
    );
    CREATE TABLE station (
        id INTEGER PRIMARY KEY,
        station TEXT,
        name TEXT,
        latitude FLOAT,
        longitude FLOAT,
        elevation FLOAT
    );
"#;

/// Fresh in-memory database with the observation schema.
///
/// A single long-lived connection keeps the in-memory database alive for the
/// whole test.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    create_schema(&pool).await;
    pool
}

pub async fn create_schema(pool: &SqlitePool) {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .expect("Failed to create schema");
}

/// Insert measurements in the given order, which becomes the scan order
pub async fn seed_measurements(pool: &SqlitePool, rows: &[MeasurementRow<'_>]) {
    for (station, date, prcp, tobs) in rows {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)")
            .bind(*station)
            .bind(*date)
            .bind(*prcp)
            .bind(*tobs)
            .execute(pool)
            .await
            .expect("Failed to insert measurement");
    }
}

pub async fn seed_stations(pool: &SqlitePool, stations: &[(&str, &str)]) {
    for (station, name) in stations {
        sqlx::query(
            "INSERT INTO station (station, name, latitude, longitude, elevation) VALUES (?1, ?2, 21.3, -157.8, 3.0)",
        )
        .bind(*station)
        .bind(*name)
        .execute(pool)
        .await
        .expect("Failed to insert station");
    }
}

/// Small dataset modelled on the Hawaii station readings.
///
/// USC00519281 reports most often; its readings span 2016-08-22 to 2017-08-23.
pub const HAWAII_SAMPLE: [MeasurementRow<'static>; 10] = [
    ("USC00519397", "2016-08-22", Some(0.4), 78.0),
    ("USC00519281", "2016-08-22", Some(1.2), 70.0),
    ("USC00519281", "2016-08-23", Some(1.79), 77.0),
    ("USC00519397", "2016-08-23", Some(0.0), 81.0),
    ("USC00513117", "2017-01-01", None, 62.0),
    ("USC00519281", "2017-01-01", Some(0.03), 66.0),
    ("USC00519281", "2017-06-15", Some(0.0), 76.0),
    ("USC00519397", "2017-08-22", Some(0.0), 82.0),
    ("USC00519281", "2017-08-18", Some(0.06), 79.0),
    ("USC00519397", "2017-08-23", Some(0.0), 81.0),
];

pub const HAWAII_STATIONS: [(&str, &str); 3] = [
    ("USC00519397", "WAIKIKI 717.2, HI US"),
    ("USC00513117", "KANEOHE 838.1, HI US"),
    ("USC00519281", "WAIHEE 837.5, HI US"),
];

pub async fn seeded_pool() -> SqlitePool {
    let pool = test_pool().await;
    seed_measurements(&pool, &HAWAII_SAMPLE).await;
    seed_stations(&pool, &HAWAII_STATIONS).await;
    pool
}
