use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use medidesk::db;
use medidesk::infrastructure::AppState;
use medidesk::models::{BranchInput, ProductInput};
use medidesk::server;
use medidesk::services::{product_service, stock_service};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn setup_app() -> (AppState, Router) {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let state = AppState::new(db);
    let app = server::build_router(state.clone(), &[]);
    (state, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let (_, app) = setup_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "medidesk");
}

#[tokio::test]
async fn test_missing_resource_returns_404_envelope() {
    let (_, app) = setup_app().await;

    let (status, body) = send(&app, "GET", "/api/branches/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "Branch not found");

    let (status, body) = send(&app, "PUT", "/api/sales/42/void", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
}

#[tokio::test]
async fn test_create_and_validation_envelopes() {
    let (_, app) = setup_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/branches",
        Some(json!({ "name": "Kandy Branch", "phone": "0812223344" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], true);
    assert_eq!(body["data"]["name"], "Kandy Branch");
    assert!(body["data"]["id"].as_i64().is_some());

    let (status, body) = send(&app, "POST", "/api/branches", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "Branch name is required");

    let (status, body) = send(
        &app,
        "POST",
        "/api/branches",
        Some(json!({ "name": "Kandy Branch" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], false);

    let (status, body) = send(&app, "GET", "/api/branches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));
}

#[tokio::test]
async fn test_sale_over_http_and_double_void() {
    let (state, app) = setup_app().await;
    let branch = state
        .branch_repo
        .create(BranchInput {
            name: "Central".into(),
            address: None,
            phone: None,
            email: None,
        })
        .await
        .unwrap();
    let product = product_service::create_product(
        state.db(),
        ProductInput {
            supplier_id: None,
            name: "Paracetamol 500mg".into(),
            sku: "PARA-500".into(),
            category: None,
            unit_price: 2.5,
            cost_price: 1.0,
            reorder_level: 0,
        },
    )
    .await
    .unwrap();
    stock_service::stock_in(state.db(), product.id, branch.id, 10, None, None)
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/sales",
        Some(json!({
            "branch_id": branch.id,
            "items": [{ "product_id": product.id, "quantity": 4 }],
            "paid_amount": 20.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["total"], 10.0);
    assert_eq!(body["data"]["change_amount"], 10.0);
    let sale_id = body["data"]["id"].as_i64().unwrap();

    let uri = format!(
        "/api/stock?product_id={}&branch_id={}",
        product.id, branch.id
    );
    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["data"]["quantity"], 6);

    let void_uri = format!("/api/sales/{}/void", sale_id);
    let (status, body) = send(&app, "PUT", &void_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "voided");

    let (status, body) = send(&app, "PUT", &void_uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], false);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["data"]["quantity"], 10);
}

#[tokio::test]
async fn test_unread_count_endpoint() {
    let (_, app) = setup_app().await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/notifications/unread-count?recipient_type=admin",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn test_reference_errors_map_to_client_statuses() {
    let (state, app) = setup_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/patients",
        Some(json!({ "name": "Nimal", "branch_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Branch not found");

    let (status, _) = send(&app, "POST", "/api/suppliers", Some(json!({ "name": "Acme" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = send(&app, "POST", "/api/suppliers", Some(json!({ "name": "Beta" }))).await;
    let beta = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/suppliers/{}", beta),
        Some(json!({ "name": "Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], false);

    let branch = state
        .branch_repo
        .create(BranchInput {
            name: "Central".into(),
            address: None,
            phone: None,
            email: None,
        })
        .await
        .unwrap();
    let product = product_service::create_product(
        state.db(),
        ProductInput {
            supplier_id: None,
            name: "Amoxicillin 250mg".into(),
            sku: "AMOX-250".into(),
            category: None,
            unit_price: 18.5,
            cost_price: 9.0,
            reorder_level: 0,
        },
    )
    .await
    .unwrap();
    let movement = json!({ "product_id": product.id, "branch_id": branch.id, "quantity": 10 });
    let (status, _) = send(&app, "POST", "/api/stock/in", Some(movement)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/stock/in",
        Some(json!({ "product_id": product.id, "branch_id": branch.id, "quantity": i32::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Stock quantity out of range");

    let (status, body) = send(&app, "DELETE", &format!("/api/suppliers/{}", beta), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    let (_, body) = send(&app, "GET", "/api/suppliers", None).await;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));
}
