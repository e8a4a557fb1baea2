use sqlx::SqlitePool;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::db::{MeasurementRepository, StationRepository};
use crate::services::ClimateService;

/// Running HTTP server
pub struct Application {
    pub local_addr: SocketAddr,
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

/// Wire repositories and the query service around a pool
pub fn build_state(pool: SqlitePool) -> AppState {
    let measurement_repo = MeasurementRepository::new(pool.clone());
    let station_repo = StationRepository::new(pool);

    AppState {
        climate_service: ClimateService::new(measurement_repo, station_repo),
    }
}

impl Application {
    /// Bind the listener and spawn the server. The server stops on Ctrl+C.
    pub async fn build(config: Config, pool: SqlitePool) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let app = create_router(build_state(pool)).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        let listener = TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Starting HTTP server on {}", local_addr);

        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
        });

        Ok(Self {
            local_addr,
            server_handle,
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` fires. A signal that cannot be installed never
/// resolves, so the server keeps running.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!("Failed to install Ctrl+C handler, serving until killed: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_waits_when_handler_is_unavailable() {
        let failed = std::future::ready(Err(std::io::Error::other("no signal support")));

        let result = tokio::time::timeout(Duration::from_millis(50), wait_for_shutdown(failed)).await;

        assert!(result.is_err(), "shutdown resolved without a signal");
    }

    #[tokio::test]
    async fn test_shutdown_resolves_on_signal() {
        let fired = std::future::ready(Ok(()));

        let result = tokio::time::timeout(Duration::from_millis(50), wait_for_shutdown(fired)).await;

        assert!(result.is_ok());
    }
}
