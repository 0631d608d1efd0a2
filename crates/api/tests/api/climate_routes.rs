use crate::helpers::{body_json, seeded_store, spawn_app, MockObservationAccess};
use climate_api::{db::Error, TemperatureSummary};
use hyper::StatusCode;
use serde_json::json;
use std::{collections::BTreeMap, sync::Arc};
use time::macros::date;

#[tokio::test]
async fn precipitation_covers_the_trailing_year_with_nulls_kept() {
    let test_app = spawn_app(Arc::new(seeded_store().await)).await;

    let response = test_app.get("/api/v1.0/precipitation").await;
    assert_eq!(response.status(), StatusCode::OK);

    // anchored to 2017-08-23, so 2016-08-23 is the first day inside the window
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!([
            { "date": "2016-08-23", "precipitation": 1.79 },
            { "date": "2017-01-01", "precipitation": null },
            { "date": "2017-08-18", "precipitation": 0.06 },
            { "date": "2017-08-23", "precipitation": 0.0 },
        ])
    );
}

#[tokio::test]
async fn stations_returns_the_full_catalog() {
    let test_app = spawn_app(Arc::new(seeded_store().await)).await;

    let response = test_app.get("/api/v1.0/stations").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let stations = body.as_array().unwrap();
    assert_eq!(stations.len(), 2);
    assert!(stations.contains(&json!({
        "station_id": "USC00519281",
        "name": "WAIHEE 837.5, HI US",
        "latitude": 21.45167,
        "longitude": -157.84889,
        "elevation": 32.9,
    })));
}

#[tokio::test]
async fn tobs_uses_the_most_active_station_window() {
    let test_app = spawn_app(Arc::new(seeded_store().await)).await;

    let response = test_app.get("/api/v1.0/tobs").await;
    assert_eq!(response.status(), StatusCode::OK);

    // USC00519281 ends on 2017-08-18, so its window starts 2016-08-18
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!([
            { "date": "2016-08-18", "temperature": 80.0 },
            { "date": "2016-08-23", "temperature": 77.0 },
            { "date": "2017-01-01", "temperature": 62.0 },
            { "date": "2017-08-18", "temperature": 79.0 },
        ])
    );
}

#[tokio::test]
async fn tobs_summary_reports_the_most_active_station() {
    let test_app = spawn_app(Arc::new(seeded_store().await)).await;

    let response = test_app.get("/api/v1.0/tobs/summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "station_id": "USC00519281", "min": 62.0, "avg": 74.5, "max": 80.0 })
    );
}

#[tokio::test]
async fn temperature_from_start_runs_to_end_of_dataset() {
    let test_app = spawn_app(Arc::new(seeded_store().await)).await;

    let response = test_app.get("/api/v1.0/2017-01-01").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "min": 62.0, "avg": 74.0, "max": 81.0 })
    );
}

#[tokio::test]
async fn temperature_between_is_inclusive_on_both_ends() {
    let test_app = spawn_app(Arc::new(seeded_store().await)).await;

    let response = test_app.get("/api/v1.0/2016-08-22/2016-08-23").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "min": 77.0, "avg": 77.5, "max": 78.0 })
    );
}

#[tokio::test]
async fn temperature_range_without_observations_is_null() {
    let test_app = spawn_app(Arc::new(seeded_store().await)).await;

    let response = test_app.get("/api/v1.0/2018-01-01").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::Value::Null);
}

#[tokio::test]
async fn reversed_range_is_rejected() {
    let mut store = MockObservationAccess::new();
    store.expect_temperature_summary().never();
    let test_app = spawn_app(Arc::new(store)).await;

    let response = test_app.get("/api/v1.0/2017-08-23/2017-01-01").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("2017-01-01"));
}

#[tokio::test]
async fn malformed_dates_are_rejected() {
    let test_app = spawn_app(Arc::new(MockObservationAccess::new())).await;

    for uri in [
        "/api/v1.0/2017-1-1",
        "/api/v1.0/20170101",
        "/api/v1.0/2017-02-30",
        "/api/v1.0/2017-01-01/tomorrow",
    ] {
        let response = test_app.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert!(body_json(response).await["error"].is_string());
    }
}

#[tokio::test]
async fn empty_dataset_is_not_found() {
    let mut store = MockObservationAccess::new();
    store
        .expect_max_observation_date()
        .times(1)
        .returning(|| Err(Error::EmptyDataset));
    let test_app = spawn_app(Arc::new(store)).await;

    let response = test_app.get("/api/v1.0/precipitation").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tobs_without_stations_is_not_found() {
    let mut store = MockObservationAccess::new();
    store
        .expect_station_observation_counts()
        .times(1)
        .returning(|| Ok(BTreeMap::new()));
    let test_app = spawn_app(Arc::new(store)).await;

    let response = test_app.get("/api/v1.0/tobs").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_failure_is_a_server_error() {
    let mut store = MockObservationAccess::new();
    store
        .expect_list_stations()
        .times(1)
        .returning(|| Err(Error::MissingTable("station")));
    let test_app = spawn_app(Arc::new(store)).await;

    let response = test_app.get("/api/v1.0/stations").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("station"));
}

#[tokio::test]
async fn open_ended_range_passes_no_upper_bound() {
    let mut store = MockObservationAccess::new();
    store
        .expect_temperature_summary()
        .withf(|filter| {
            filter.from == Some(date!(2017 - 08 - 01))
                && filter.to.is_none()
                && filter.station_id.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(Some(TemperatureSummary {
                min: 70.0,
                avg: 75.0,
                max: 80.0,
            }))
        });
    let test_app = spawn_app(Arc::new(store)).await;

    let response = test_app.get("/api/v1.0/2017-08-01").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "min": 70.0, "avg": 75.0, "max": 80.0 })
    );
}
