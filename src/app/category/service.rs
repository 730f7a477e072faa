//! 分类业务服务

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use super::model::Category;
use crate::core::error::AppError;

#[derive(Clone)]
pub struct CategoryService {
    db: SqlitePool,
}

impl CategoryService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    pub async fn get_category(&self, id: i64) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, created_at) VALUES (?, ?) RETURNING id, name, created_at",
        )
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        info!("Created category: {} ({})", category.name, category.id);
        Ok(category)
    }

    /// 删除分类，引用它的产品保留并解除关联
    pub async fn delete_category(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        info!("Deleted category: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::{model::NewProduct, service::ProductService};
    use crate::infrastructure::{config::DatabaseConfig, database::DatabaseManager};

    async fn pool() -> SqlitePool {
        DatabaseManager::new(&DatabaseConfig::in_memory())
            .await
            .unwrap()
            .get_pool()
            .clone()
    }

    #[tokio::test]
    async fn test_category_names_are_not_unique() {
        let service = CategoryService::new(pool().await);
        let first = service.create_category("Fruit").await.unwrap();
        let second = service.create_category("Fruit").await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(service.list_categories().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_category_detaches_products() {
        let pool = pool().await;
        let categories = CategoryService::new(pool.clone());
        let products = ProductService::new(pool);

        let fruit = categories.create_category("Fruit").await.unwrap();
        let banana = products
            .create_product(NewProduct::new("Banana", 100.0).in_category(fruit.id))
            .await
            .unwrap();

        categories.delete_category(fruit.id).await.unwrap();

        let banana = products.get_product(banana.id).await.unwrap();
        assert_eq!(banana.category_id, None);
        assert!(matches!(
            categories.get_category(fruit.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_category() {
        let service = CategoryService::new(pool().await);
        assert!(matches!(
            service.delete_category(7).await,
            Err(AppError::NotFound(_))
        ));
    }
}
