/// Failures talking to the observation store
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Observation query failed: {0}")]
    SqlxError(#[from] sqlx::Error),
}
