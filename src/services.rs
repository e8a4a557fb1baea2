pub mod climate_service;
pub mod error;

pub use climate_service::{ClimateService, ObservationField, RecentTemperatures, TemperatureSummary};
pub use error::ServiceError;
