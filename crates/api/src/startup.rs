use crate::{
    climate::{
        ClimateQueryService, ErrorBody, PrecipitationReading, StationTemperatureSummary,
        TemperatureReading,
    },
    db::{ObservationStore, SqliteObservationStore},
    index_handler, precipitation, routes, stations, temperature_between, temperature_from, tobs,
    tobs_summary, Observation, Station, TemperatureSummary,
};
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub climate: Arc<ClimateQueryService>,
}

impl AppState {
    pub fn new(remote_url: String, store: Arc<dyn ObservationStore>) -> Self {
        Self {
            remote_url,
            climate: Arc::new(ClimateQueryService::new(store)),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::tobs_summary,
        routes::climate::climate_routes::temperature_from,
        routes::climate::climate_routes::temperature_between,
    ),
    components(
        schemas(
            PrecipitationReading,
            TemperatureReading,
            StationTemperatureSummary,
            TemperatureSummary,
            Station,
            Observation,
            ErrorBody,
        )
    ),
    tags(
        (name = "hawaii climate api", description = "Precipitation and temperature statistics over the Hawaii station dataset")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    remote_url: String,
    database: String,
    max_connections: u32,
) -> Result<AppState, anyhow::Error> {
    let store = SqliteObservationStore::open(&database, max_connections).await?;
    Ok(AppState::new(remote_url, Arc::new(store)))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/tobs/summary", get(tobs_summary))
        .route("/api/v1.0/{start}", get(temperature_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
