use crate::dates::DateError;
use crate::db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid date '{value}': expected YYYY-MM-DD ({source})")]
    InvalidDateFormat {
        value: String,
        #[source]
        source: DateError,
    },
    #[error("Stored measurement date '{value}' is not YYYY-MM-DD ({source})")]
    MalformedStoredDate {
        value: String,
        #[source]
        source: DateError,
    },
    #[error("Observation store unavailable: {0}")]
    StoreUnavailable(#[from] DbError),
}
