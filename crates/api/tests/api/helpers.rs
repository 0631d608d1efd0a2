use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
    response::Response,
    Router,
};
use climate_api::{
    app, db::Error, AppState, Observation, ObservationFilter, ObservationStore,
    SqliteObservationStore, Station, TemperatureSummary,
};
use hyper::{header, Method};
use mockall::mock;
use sqlx::sqlite::SqlitePoolOptions;
use std::{collections::BTreeMap, sync::Arc};
use time::Date;
use tower::ServiceExt;

pub const REMOTE_URL: &str = "http://127.0.0.1:9810";

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(store: Arc<dyn ObservationStore>) -> TestApp {
    let app_state = AppState::new(REMOTE_URL.to_string(), store);
    TestApp {
        app: app(app_state),
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();

        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

mock! {
    pub ObservationAccess {}
    #[async_trait]
    impl ObservationStore for ObservationAccess {
        async fn max_observation_date(&self) -> Result<Date, Error>;
        async fn max_date_for_station(&self, station_id: &str) -> Result<Date, Error>;
        async fn observations_in_range(
            &self,
            filter: &ObservationFilter,
        ) -> Result<Vec<Observation>, Error>;
        async fn station_observation_counts(&self) -> Result<BTreeMap<String, i64>, Error>;
        async fn temperature_summary(
            &self,
            filter: &ObservationFilter,
        ) -> Result<Option<TemperatureSummary>, Error>;
        async fn list_stations(&self) -> Result<Vec<Station>, Error>;
    }
}

/// Small slice of the Hawaii dataset: two stations, USC00519281 the busier one.
pub async fn seeded_store() -> SqliteObservationStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query(
        "CREATE TABLE measurement (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            station TEXT, date TEXT, prcp FLOAT, tobs FLOAT)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TABLE station (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            station TEXT, name TEXT, latitude FLOAT, longitude FLOAT, elevation FLOAT)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let measurements: &[(&str, &str, Option<f64>, f64)] = &[
        ("USC00519281", "2016-08-18", Some(0.06), 80.0),
        ("USC00519281", "2016-08-23", Some(1.79), 77.0),
        ("USC00519281", "2017-01-01", None, 62.0),
        ("USC00519281", "2017-08-18", Some(0.06), 79.0),
        ("USC00519397", "2016-08-22", Some(0.0), 78.0),
        ("USC00519397", "2017-08-23", Some(0.0), 81.0),
    ];
    for (station, date, prcp, tobs) in measurements {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
            .bind(*station)
            .bind(*date)
            .bind(*prcp)
            .bind(*tobs)
            .execute(&pool)
            .await
            .unwrap();
    }

    let stations: &[(&str, &str, f64, f64, f64)] = &[
        ("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0),
        ("USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
    ];
    for (station, name, latitude, longitude, elevation) in stations {
        sqlx::query(
            "INSERT INTO station (station, name, latitude, longitude, elevation)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(*station)
        .bind(*name)
        .bind(*latitude)
        .bind(*longitude)
        .bind(*elevation)
        .execute(&pool)
        .await
        .unwrap();
    }

    SqliteObservationStore::from_pool(pool)
}
