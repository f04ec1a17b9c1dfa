//! Product commands

use catalog_common::utils::is_blank;
use catalog_errors::{AppError, AppResult};
use rust_decimal::Decimal;

use crate::domain::entities::{NewProduct, ProductChanges};

/// 商品名称最大长度（字符）
pub const MAX_NAME_LENGTH: usize = 255;

/// 价格保留的小数位数，与 `NUMERIC(12, 2)` 一致
pub const PRICE_SCALE: u32 = 2;

/// 价格上限（不含），`NUMERIC(12, 2)` 的整数部分最多 10 位
fn price_limit() -> Decimal {
    Decimal::new(10_000_000_000, 0)
}

fn validate_name(name: &str) -> AppResult<()> {
    if is_blank(name) {
        return Err(AppError::validation("name must not be blank"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> AppResult<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::validation("price must be greater than or equal to 0"));
    }
    if price.round_dp(PRICE_SCALE) >= price_limit() {
        return Err(AppError::validation(format!(
            "price must be less than {}",
            price_limit()
        )));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::validation("stock must be greater than or equal to 0"));
    }
    Ok(())
}

/// 创建商品命令
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

impl CreateProductCommand {
    pub fn validate(&self) -> AppResult<()> {
        validate_name(&self.name)?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;
        Ok(())
    }

    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price.round_dp(PRICE_SCALE),
            stock: self.stock,
        }
    }
}

/// 部分更新商品命令
#[derive(Debug, Clone, Default)]
pub struct UpdateProductCommand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

impl UpdateProductCommand {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(())
    }

    pub fn into_changes(self) -> ProductChanges {
        ProductChanges {
            name: self.name,
            description: self.description,
            price: self.price.map(|p| p.round_dp(PRICE_SCALE)),
            stock: self.stock,
        }
    }
}
