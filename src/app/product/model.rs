//! 产品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::core::error::AppError;

pub const PRICE_NOT_A_NUMBER: &str = "Price must be a number";
pub const DUPLICATE_NAME: &str = "Product with this name already exists";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub is_18_plus: bool,
    pub created_at: DateTime<Utc>,
    pub category_id: Option<i64>,
}

/// 创建产品请求
///
/// `price` 既可以是 JSON 数字也可以是数字字符串，解析见 [`parse_price`]。
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub is_18_plus: Option<bool>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// 已校验的产品字段
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub is_18_plus: bool,
    pub category_id: Option<i64>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            is_18_plus: false,
            category_id: None,
        }
    }

    pub fn adults_only(mut self, is_18_plus: bool) -> Self {
        self.is_18_plus = is_18_plus;
        self
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = AppError;

    fn try_from(mut request: CreateProductRequest) -> Result<Self, Self::Error> {
        request.name = request.name.trim().to_string();
        request.validate()?;
        let price = parse_price(request.price.as_ref())?;

        Ok(Self {
            name: request.name,
            price,
            is_18_plus: request.is_18_plus.unwrap_or(false),
            category_id: request.category_id,
        })
    }
}

/// 解析价格：接受有限的 JSON 数字或可解析为数字的字符串
pub fn parse_price(raw: Option<&Value>) -> Result<f64, AppError> {
    let price = match raw {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    price
        .filter(|p| p.is_finite())
        .ok_or_else(|| AppError::Validation(PRICE_NOT_A_NUMBER.to_string()))
}
