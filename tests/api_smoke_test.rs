mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not JSON")
}

#[tokio::test]
async fn health_endpoint_reports_database_status() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn accounts_endpoint_lists_the_chart_of_accounts() {
    let app = TestApp::with_seed().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/api/v1/accounts").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(19));
}

#[tokio::test]
async fn templates_endpoint_serves_the_catalog() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/v1/templates/setoran_modal")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["key"], "setoran_modal");
    assert_eq!(body["lines"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn unbalanced_journal_is_unprocessable_over_http() {
    let app = TestApp::with_seed().await;
    let accounts = app.services().accounts.list().await.unwrap();
    let kas = accounts.iter().find(|a| a.kind == "kas").unwrap();
    let pendapatan = accounts.iter().find(|a| a.kind == "pendapatan").unwrap();

    let payload = json!({
        "date": "2025-03-01T00:00:00Z",
        "description": "jurnal tidak seimbang",
        "lines": [
            { "account_id": kas.id, "debit": "50000", "credit": "0" },
            { "account_id": pendapatan.id, "debit": "0", "credit": "40000" }
        ]
    });

    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/api/v1/journals")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("balance"));
}

#[tokio::test]
async fn trial_balance_endpoint_returns_matching_totals() {
    let app = TestApp::with_seed().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/v1/reports/trial-balance")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_debit"], body["total_credit"]);
}

#[tokio::test]
async fn unknown_template_is_a_404_with_error_envelope() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/v1/templates/tidak_ada")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Not Found");
}
