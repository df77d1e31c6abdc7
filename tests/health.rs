mod common;

use axum::extract::State;
use menu_order_api::routes::health::health_check;

#[tokio::test]
async fn health_check_returns_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = common::offline_state(dir.path());

    let response = health_check(State(state.clone())).await;
    assert_eq!(response.0.message, "Health check");
    let body = serde_json::to_value(&response.0).expect("serializable");
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["catalog_live"], false);

    state.catalog.publish(common::sample_snapshot());
    let response = health_check(State(state)).await;
    let body = serde_json::to_value(&response.0).expect("serializable");
    assert_eq!(body["data"]["catalog_live"], true);
    assert_eq!(body["data"]["catalog_revision"], 1);
}
