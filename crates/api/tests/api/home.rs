use crate::helpers::{body_text, spawn_app, MockObservationAccess, REMOTE_URL};
use hyper::StatusCode;
use std::sync::Arc;

#[tokio::test]
async fn welcome_page_lists_routes() {
    let test_app = spawn_app(Arc::new(MockObservationAccess::new())).await;

    let response = test_app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Hawaii Climate Info API"));
    assert!(html.contains("/api/v1.0/precipitation"));
    assert!(html.contains("/api/v1.0/stations"));
    assert!(html.contains("/api/v1.0/tobs"));
    assert!(html.contains(&format!("{}/docs", REMOTE_URL)));
}

#[tokio::test]
async fn api_docs_are_served() {
    let test_app = spawn_app(Arc::new(MockObservationAccess::new())).await;

    let response = test_app.get("/docs").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let test_app = spawn_app(Arc::new(MockObservationAccess::new())).await;

    let response = test_app.get("/api/v1.0/2017-01-01/2017-02-01/extra").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
