use axum::{
    extract::{Path, State},
    Json,
};
use log::debug;
use std::sync::Arc;

use crate::{
    climate::{
        Error, ErrorBody, PrecipitationReading, StationTemperatureSummary, TemperatureReading,
    },
    dates::parse_date,
    AppState, Station, TemperatureSummary,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation for the trailing year of the dataset, ascending by date", body = Vec<PrecipitationReading>),
        (status = NOT_FOUND, description = "The dataset holds no observations", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PrecipitationReading>>, Error> {
    let trend = state.climate.precipitation_trend().await?;
    Ok(Json(trend))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every observing station", body = Vec<Station>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorBody)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Station>>, Error> {
    let catalog = state.climate.station_catalog().await?;
    Ok(Json(catalog))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Trailing year of temperature observations from the most active station", body = Vec<TemperatureReading>),
        (status = NOT_FOUND, description = "No station has recorded observations", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorBody)
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureReading>>, Error> {
    let trend = state.climate.most_active_station_trend().await?;
    debug!(
        "most active station {} returned {} observations",
        trend.station_id,
        trend.observations.len()
    );
    Ok(Json(trend.observations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs/summary",
    responses(
        (status = OK, description = "Temperature extremes and mean of the most active station", body = StationTemperatureSummary),
        (status = NOT_FOUND, description = "No station has recorded observations", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorBody)
    ))]
pub async fn tobs_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StationTemperatureSummary>, Error> {
    let summary = state.climate.most_active_station_summary().await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "First date of the range (YYYY-MM-DD), inclusive"),
    ),
    responses(
        (status = OK, description = "Temperature summary from start through the end of the dataset, null when no observations match", body = TemperatureSummary),
        (status = BAD_REQUEST, description = "Start is not a YYYY-MM-DD date", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorBody)
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Option<TemperatureSummary>>, Error> {
    let start = parse_date(&start).map_err(Error::InvalidDate)?;
    let summary = state.climate.temperature_summary(start, None).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "First date of the range (YYYY-MM-DD), inclusive"),
        ("end" = String, Path, description = "Last date of the range (YYYY-MM-DD), inclusive"),
    ),
    responses(
        (status = OK, description = "Temperature summary for the range, null when no observations match", body = TemperatureSummary),
        (status = BAD_REQUEST, description = "A date is malformed or end precedes start", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorBody)
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Option<TemperatureSummary>>, Error> {
    let start = parse_date(&start).map_err(Error::InvalidDate)?;
    let end = parse_date(&end).map_err(Error::InvalidDate)?;
    let summary = state.climate.temperature_summary(start, Some(end)).await?;
    Ok(Json(summary))
}
