//! # catalog
//!
//! 商品与分类的 REST 后端，采用分层结构：
//! - `app`：路由、处理器与业务服务
//! - `core`：错误处理与中间件
//! - `infrastructure`：配置、数据库、日志

pub mod app;
pub mod core;
pub mod infrastructure;

use axum::Router;
use std::time::Duration;

use crate::{
    app::{create_routes, seed::seed_sample_data, AppState},
    infrastructure::{config::Config, database::DatabaseManager},
};

/// 按配置连接数据库、按需写入示例数据并构建路由
pub async fn build_app(config: &Config) -> anyhow::Result<Router> {
    let db = DatabaseManager::new(&config.database).await?;
    let state = AppState::new(db.get_pool().clone());

    if config.database.seed_sample_data {
        seed_sample_data(&state).await?;
    }

    Ok(create_routes(
        state,
        Duration::from_secs(config.http.timeout_seconds),
    ))
}
