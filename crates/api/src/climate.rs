use crate::{
    dates::{self, iso_date, one_year_before},
    db::{self, ObservationFilter, ObservationStore, Station, TemperatureSummary},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use time::Date;
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Observation dataset is empty")]
    EmptyDataset,
    #[error("No stations have recorded observations")]
    NoStations,
    #[error("No observations recorded for station '{0}'")]
    NoObservationsForStation(String),
    #[error("End date {end} is before start date {start}")]
    InvalidRange { start: Date, end: Date },
    #[error("Invalid date: {0}")]
    InvalidDate(dates::Error),
    #[error("Failed to compute trailing window: {0}")]
    Window(dates::Error),
    #[error("Failed to read observation dataset: {0}")]
    Store(db::Error),
}

impl From<db::Error> for Error {
    fn from(err: db::Error) -> Self {
        match err {
            db::Error::EmptyDataset => Error::EmptyDataset,
            db::Error::NoObservationsForStation(station_id) => {
                Error::NoObservationsForStation(station_id)
            }
            other => Error::Store(other),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidRange { .. } | Error::InvalidDate(_) => StatusCode::BAD_REQUEST,
            Error::EmptyDataset | Error::NoStations | Error::NoObservationsForStation(_) => {
                StatusCode::NOT_FOUND
            }
            Error::Window(_) | Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("error serving climate query: {}", self);
        } else {
            warn!("rejected climate query: {}", self);
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct PrecipitationReading {
    #[serde(with = "iso_date")]
    #[schema(value_type = String, format = Date, example = "2017-08-23")]
    pub date: Date,
    /// `null` when no rainfall was recorded for that day
    pub precipitation: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TemperatureReading {
    #[serde(with = "iso_date")]
    #[schema(value_type = String, format = Date, example = "2017-08-23")]
    pub date: Date,
    pub temperature: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct StationTemperatureTrend {
    pub station_id: String,
    pub observations: Vec<TemperatureReading>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct StationTemperatureSummary {
    pub station_id: String,
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

/// Picks the station with the most observations.
///
/// Ties go to the lexicographically smallest station id.
pub fn select_most_active(counts: &BTreeMap<String, i64>) -> Option<(&str, i64)> {
    // BTreeMap iterates ascending, so keeping the first maximum keeps the smallest id
    counts
        .iter()
        .fold(None, |best: Option<(&str, i64)>, (station_id, &count)| {
            match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((station_id.as_str(), count)),
            }
        })
}

/// Derived climate views composed from [`ObservationStore`] primitives.
///
/// All trailing windows are anchored to the dataset's own latest date, never the wall clock.
pub struct ClimateQueryService {
    store: Arc<dyn ObservationStore>,
}

impl ClimateQueryService {
    pub fn new(store: Arc<dyn ObservationStore>) -> Self {
        Self { store }
    }

    /// Precipitation for every observation in the year ending at the dataset's latest date.
    pub async fn precipitation_trend(&self) -> Result<Vec<PrecipitationReading>, Error> {
        let latest = self.store.max_observation_date().await?;
        let window_start = one_year_before(latest).map_err(Error::Window)?;
        debug!("precipitation window {} to {}", window_start, latest);

        let observations = self
            .store
            .observations_in_range(&ObservationFilter::new().from(window_start))
            .await?;

        Ok(observations
            .into_iter()
            .map(|obs| PrecipitationReading {
                date: obs.date,
                precipitation: obs.precipitation,
            })
            .collect())
    }

    pub async fn station_catalog(&self) -> Result<Vec<Station>, Error> {
        Ok(self.store.list_stations().await?)
    }

    /// Temperature observations of the busiest station over its own trailing year.
    pub async fn most_active_station_trend(&self) -> Result<StationTemperatureTrend, Error> {
        let station_id = self.most_active_station().await?;
        let latest = self.store.max_date_for_station(&station_id).await?;
        let window_start = one_year_before(latest).map_err(Error::Window)?;

        let observations = self
            .store
            .observations_in_range(
                &ObservationFilter::new()
                    .station(&station_id)
                    .from(window_start),
            )
            .await?
            .into_iter()
            .map(|obs| TemperatureReading {
                date: obs.date,
                temperature: obs.temperature,
            })
            .collect();

        Ok(StationTemperatureTrend {
            station_id,
            observations,
        })
    }

    /// Lowest, mean and highest temperature ever recorded by the busiest station.
    pub async fn most_active_station_summary(&self) -> Result<StationTemperatureSummary, Error> {
        let station_id = self.most_active_station().await?;
        let summary = self
            .store
            .temperature_summary(&ObservationFilter::new().station(&station_id))
            .await?
            .ok_or_else(|| Error::NoObservationsForStation(station_id.clone()))?;

        Ok(StationTemperatureSummary {
            station_id,
            min: summary.min,
            avg: summary.avg,
            max: summary.max,
        })
    }

    /// Temperature summary from `start` through `end`, or through the end of the dataset.
    ///
    /// `Ok(None)` means the range is valid but holds no observations.
    pub async fn temperature_summary(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<Option<TemperatureSummary>, Error> {
        if let Some(end) = end {
            if end < start {
                return Err(Error::InvalidRange { start, end });
            }
        }

        let summary = self
            .store
            .temperature_summary(&ObservationFilter::new().from(start).to(end))
            .await?;
        if summary.is_none() {
            info!("no observations between {} and {:?}", start, end);
        }
        Ok(summary)
    }

    async fn most_active_station(&self) -> Result<String, Error> {
        let counts = self.store.station_observation_counts().await?;
        let (station_id, count) = select_most_active(&counts).ok_or(Error::NoStations)?;
        debug!(
            "most active station {} with {} observations",
            station_id, count
        );
        Ok(station_id.to_owned())
    }
}
