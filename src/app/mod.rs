//! 应用层：路由、共享状态与各资源的处理器

pub mod category;
pub mod health;
pub mod product;
pub mod seed;

use axum::{middleware, routing::get, Router};
use sqlx::SqlitePool;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use self::{category::service::CategoryService, product::service::ProductService};
use crate::core::middleware::request_logging_middleware;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub product_service: ProductService,
    pub category_service: CategoryService,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            product_service: ProductService::new(db.clone()),
            category_service: CategoryService::new(db.clone()),
            db,
        }
    }
}

/// 创建路由
pub fn create_routes(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/products",
            get(product::handler::list_products).post(product::handler::create_product),
        )
        .route(
            "/products/:id",
            get(product::handler::get_product).delete(product::handler::delete_product),
        )
        .route(
            "/categories",
            get(category::handler::list_categories).post(category::handler::create_category),
        )
        .route(
            "/categories/:id",
            get(category::handler::get_category).delete(category::handler::delete_category),
        )
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
