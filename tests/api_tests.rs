//! HTTP 接口集成测试
//!
//! 每个测试使用独立的内存数据库。

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use catalog::{
    app::{create_routes, product::model::NewProduct, AppState},
    infrastructure::{config::DatabaseConfig, database::DatabaseManager},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        let db = DatabaseManager::new(&DatabaseConfig::in_memory())
            .await
            .expect("failed to open in-memory database");
        let state = AppState::new(db.get_pool().clone());
        let router = create_routes(state.clone(), Duration::from_secs(5));
        Self { router, state }
    }

    /// 标准夹具：Duplicate 通过获取或创建写入，Banana 归属 Fruit 分类
    async fn with_fixtures() -> (Self, i64) {
        let app = Self::new().await;
        app.state
            .product_service
            .get_or_create_product(NewProduct::new("Duplicate", 100.0))
            .await
            .unwrap();
        let fruit = app
            .state
            .category_service
            .create_category("Fruit")
            .await
            .unwrap();
        let banana = app
            .state
            .product_service
            .create_product(
                NewProduct::new("Banana", 100.0)
                    .adults_only(false)
                    .in_category(fruit.id),
            )
            .await
            .unwrap();
        (app, banana.id)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }
}

#[tokio::test]
async fn test_products_get() {
    let app = TestApp::new().await;
    app.state
        .product_service
        .create_product(NewProduct::new("Banana", 100.0))
        .await
        .unwrap();

    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Banana");
}

#[tokio::test]
async fn test_products_get_empty() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_products_post() {
    let (app, _) = TestApp::with_fixtures().await;

    let (status, body) = app
        .post("/products", json!({"name": "test_5", "price": "100"}))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "test_5");
    assert_eq!(body["price"].as_f64(), Some(100.0));
    assert_eq!(body["is_18_plus"], false);
    assert!(body["id"].is_i64());
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_products_post_with_category() {
    let (app, _) = TestApp::with_fixtures().await;
    let (_, category) = app.post("/categories", json!({"name": "Drinks"})).await;

    let (status, body) = app
        .post(
            "/products",
            json!({"name": "test_wine", "price": 12.5, "is_18_plus": true, "category_id": category["id"]}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_18_plus"], true);
    assert_eq!(body["category_id"], category["id"]);
}

#[tokio::test]
async fn test_product_post_duplicate_name() {
    let (app, _) = TestApp::with_fixtures().await;

    let (status, body) = app
        .post("/products", json!({"name": "Duplicate", "price": 100}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Product with this name already exists");

    let (_, products) = app.get("/products").await;
    let duplicates = products
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["name"] == "Duplicate")
        .count();
    assert_eq!(duplicates, 1);
}

#[tokio::test]
async fn test_product_post_invalid_data() {
    let (app, _) = TestApp::with_fixtures().await;

    let (status, body) = app
        .post("/products", json!({"name": "Invalid", "price": "invalid"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Price must be a number");
}

#[tokio::test]
async fn test_product_post_missing_price() {
    let app = TestApp::new().await;
    let (status, body) = app.post("/products", json!({"name": "NoPrice"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Price must be a number");
}

#[tokio::test]
async fn test_product_post_unknown_category() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post("/products", json!({"name": "Orphan", "price": 1, "category_id": 999}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Category does not exist");
}

#[tokio::test]
async fn test_product_post_malformed_body() {
    let app = TestApp::new().await;
    let (status, body) = app.post("/products", json!({"price": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_existing_product_delete() {
    let (app, banana_id) = TestApp::with_fixtures().await;

    let (status, body) = app.delete(&format!("/products/{}", banana_id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, products) = app.get("/products").await;
    assert!(products
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["id"] != json!(banana_id)));

    let (status, _) = app.get(&format!("/products/{}", banana_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_not_existing_product_delete() {
    let (app, _) = TestApp::with_fixtures().await;

    let (status, body) = app.delete("/products/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product 999 not found");
}

#[tokio::test]
async fn test_invalid_product_id() {
    let app = TestApp::new().await;
    let (status, body) = app.delete("/products/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_get_product() {
    let (app, banana_id) = TestApp::with_fixtures().await;
    let (status, body) = app.get(&format!("/products/{}", banana_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Banana");
}

#[tokio::test]
async fn test_categories_crud() {
    let app = TestApp::new().await;

    let (status, created) = app.post("/categories", json!({"name": "Fruit"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Fruit");
    let id = created["id"].as_i64().unwrap();

    let (status, list) = app.get("/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, fetched) = app.get(&format!("/categories/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["id"]);

    let (status, _) = app.delete(&format!("/categories/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.delete(&format!("/categories/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_blank_name() {
    let app = TestApp::new().await;
    let (status, body) = app.post("/categories", json!({"name": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name must be between 1 and 255 characters");
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
