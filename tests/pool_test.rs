// Read-only pool construction against a database file on disk

mod common;

use climate_api_service::config::Config;
use climate_api_service::db::{self, StationRepository};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

async fn write_fixture_database(path: &std::path::Path) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create fixture database");

    common::create_schema(&pool).await;
    common::seed_stations(&pool, &common::HAWAII_STATIONS).await;
    pool.close().await;
}

#[tokio::test]
async fn test_connect_opens_existing_file_read_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hawaii.sqlite");
    write_fixture_database(&path).await;

    let config = Config::for_database(format!("sqlite://{}", path.display()));
    let pool = db::connect(&config).await.unwrap();

    let stations = StationRepository::new(pool.clone())
        .find_all_ids()
        .await
        .unwrap();
    assert_eq!(stations.len(), 3);

    let write = sqlx::query("INSERT INTO station (station) VALUES ('USC00000000')")
        .execute(&pool)
        .await;
    assert!(write.is_err(), "read-only pool accepted a write");
}

#[tokio::test]
async fn test_connect_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sqlite");

    let config = Config::for_database(format!("sqlite://{}", path.display()));

    assert!(db::connect(&config).await.is_err());
    assert!(!path.exists());
}
