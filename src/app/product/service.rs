//! 产品业务服务

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use super::model::{NewProduct, Product, DUPLICATE_NAME};
use crate::core::error::AppError;

pub const CATEGORY_MISSING: &str = "Category does not exist";

const GET_OR_CREATE_ATTEMPTS: usize = 2;

const PRODUCT_COLUMNS: &str = "id, name, price, is_18_plus, created_at, category_id";

#[derive(Clone)]
pub struct ProductService {
    db: SqlitePool,
}

impl ProductService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = ?",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    /// 严格创建：同名产品已存在时失败
    ///
    /// 唯一性由 `products.name` 的唯一索引保证，插入冲突映射为 [`AppError::Conflict`]。
    pub async fn create_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let created = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, price, is_18_plus, created_at, category_id) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(&product.name)
        .bind(product.price)
        .bind(product.is_18_plus)
        .bind(Utc::now())
        .bind(product.category_id)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)?;

        info!("Created product: {} ({})", created.name, created.id);
        Ok(created)
    }

    /// 获取或创建：返回同名的已有产品，不存在时创建
    ///
    /// 第二个返回值表示本次是否新建。
    pub async fn get_or_create_product(
        &self,
        product: NewProduct,
    ) -> Result<(Product, bool), AppError> {
        for _ in 0..GET_OR_CREATE_ATTEMPTS {
            if let Some(created) = self.insert_if_absent(&product).await? {
                info!("Created product: {} ({})", created.name, created.id);
                return Ok((created, true));
            }
            // 冲突行可能在插入与读取之间被删除，此时重新插入
            if let Some(existing) = self.find_product_by_name(&product.name).await? {
                return Ok((existing, false));
            }
        }

        Err(AppError::Conflict(DUPLICATE_NAME.to_string()))
    }

    pub async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE name = ?",
            PRODUCT_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.db)
        .await?;

        Ok(product)
    }

    async fn insert_if_absent(&self, product: &NewProduct) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, price, is_18_plus, created_at, category_id) \
             VALUES (?, ?, ?, ?, ?) ON CONFLICT(name) DO NOTHING RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(&product.name)
        .bind(product.price)
        .bind(product.is_18_plus)
        .bind(Utc::now())
        .bind(product.category_id)
        .fetch_optional(&self.db)
        .await
        .map_err(map_insert_error)
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }

        info!("Deleted product: {}", id);
        Ok(())
    }
}

fn map_insert_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict(DUPLICATE_NAME.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::Validation(CATEGORY_MISSING.to_string());
        }
    }
    AppError::Database(err)
}
