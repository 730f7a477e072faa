//! 示例数据
//!
//! 全部通过获取或创建写入，重复启动不会产生重复记录。

use tracing::info;

use super::AppState;
use crate::{app::product::model::NewProduct, core::error::AppError};

const SAMPLE_CATEGORIES: [&str; 2] = ["Fruit", "Beverages"];

/// (名称, 价格, 是否限 18+, 分类下标)
const SAMPLE_PRODUCTS: [(&str, f64, bool, usize); 4] = [
    ("Banana", 1.2, false, 0),
    ("Apple", 0.8, false, 0),
    ("Orange Juice", 3.5, false, 1),
    ("Red Wine", 12.0, true, 1),
];

/// 写入示例数据，返回新建的产品数量
pub async fn seed_sample_data(state: &AppState) -> Result<usize, AppError> {
    info!("Seeding database with example data...");

    let existing = state.category_service.list_categories().await?;
    let mut category_ids = Vec::with_capacity(SAMPLE_CATEGORIES.len());
    for name in SAMPLE_CATEGORIES {
        let id = match existing.iter().find(|c| c.name == name) {
            Some(category) => category.id,
            None => state.category_service.create_category(name).await?.id,
        };
        category_ids.push(id);
    }

    let mut created_count = 0;
    for (name, price, is_18_plus, category) in SAMPLE_PRODUCTS {
        let product = NewProduct::new(name, price)
            .adults_only(is_18_plus)
            .in_category(category_ids[category]);
        let (_, created) = state.product_service.get_or_create_product(product).await?;
        if created {
            created_count += 1;
        }
    }

    info!("Seeded {} new products", created_count);
    Ok(created_count)
}
