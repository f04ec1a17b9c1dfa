//! 商品仓储接口

use async_trait::async_trait;
use catalog_common::UserId;
use catalog_errors::AppResult;

use crate::domain::entities::{NewProduct, Product, ProductChanges};
use crate::domain::value_objects::ProductId;

/// 商品仓储接口
///
/// 所有方法都在所属工作单元的事务内执行。
/// 违反名称唯一约束时 `insert` / `update_fields` 返回 `AppError::Conflict`。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 检查名称是否已存在（大小写敏感）
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    /// 插入新商品，返回分配的 ID
    async fn insert(&self, product: &NewProduct, created_by: &UserId) -> AppResult<ProductId>;

    /// 查询全部商品
    async fn select_all(&self) -> AppResult<Vec<Product>>;

    /// 根据 ID 查找商品
    async fn select_by_id(&self, id: ProductId) -> AppResult<Option<Product>>;

    /// 只更新 `changes` 中提供的字段
    async fn update_fields(&self, id: ProductId, changes: &ProductChanges) -> AppResult<()>;

    /// 根据 ID 删除商品
    async fn delete_by_id(&self, id: ProductId) -> AppResult<()>;
}
