//! 数据库基础设施

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
    Error,
};
use std::{str::FromStr, time::Duration};
use tracing::info;

use super::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    /// 建立连接池并创建数据表
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.acquire_timeout_seconds));

        let pool_options =
            SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

        // 内存库随连接关闭而消失，只能保持单个永不过期的连接；文件库用 WAL 支持并发读写
        let (pool_options, options) = if config.is_in_memory() {
            let pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (pool_options, options)
        } else {
            (
                pool_options.max_connections(config.max_connections),
                options.journal_mode(SqliteJournalMode::Wal),
            )
        };

        let pool = pool_options.connect_with(options).await?;
        create_tables(&pool).await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// 创建数据库表
pub async fn create_tables(pool: &SqlitePool) -> Result<(), Error> {
    info!("Creating database tables...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            price REAL NOT NULL,
            is_18_plus INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_products_name ON products(name)")
        .execute(pool)
        .await?;

    info!("Database tables created successfully");
    Ok(())
}
