use super::{Observation, ObservationFilter, Station, TemperatureSummary};
use crate::dates;
use async_trait::async_trait;
use std::collections::BTreeMap;
use time::Date;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query observation dataset: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Stored date is not usable: {0}")]
    Date(#[from] dates::Error),
    #[error("Observation dataset is missing table '{0}'")]
    MissingTable(&'static str),
    #[error("Observation dataset is empty")]
    EmptyDataset,
    #[error("No observations recorded for station '{0}'")]
    NoObservationsForStation(String),
}

/// Read-only primitives over the measurement and station collections.
///
/// Every method is a pure read; implementations must be safe to call concurrently.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Latest date across all observations.
    async fn max_observation_date(&self) -> Result<Date, Error>;
    /// Latest date observed by one station.
    async fn max_date_for_station(&self, station_id: &str) -> Result<Date, Error>;
    /// Observations matching the filter, ascending by date. Empty when nothing matches.
    async fn observations_in_range(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, Error>;
    /// Number of observations per station present in the measurement collection.
    async fn station_observation_counts(&self) -> Result<BTreeMap<String, i64>, Error>;
    /// Temperature aggregate over the filter, `None` when no rows match.
    async fn temperature_summary(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Option<TemperatureSummary>, Error>;
    async fn list_stations(&self) -> Result<Vec<Station>, Error>;
}
