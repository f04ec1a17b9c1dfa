//! 数据库行映射

use rust_decimal::Decimal;

use crate::domain::entities::Product;
use crate::domain::value_objects::ProductId;

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
        }
    }
}
