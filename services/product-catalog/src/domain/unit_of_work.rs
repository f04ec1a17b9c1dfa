//! Unit of Work 模式
//!
//! 每个请求一个工作单元：请求开始时打开，处理成功后提交，
//! 未提交即被丢弃时回滚。

use async_trait::async_trait;
use catalog_errors::AppResult;

use crate::domain::repositories::ProductRepository;

/// Unit of Work trait
///
/// # 使用示例
///
/// ```ignore
/// let uow = uow_factory.begin().await?;
///
/// uow.products().insert(&product, &user_id).await?;
///
/// // 提交事务；若在此之前 drop，则所有更改被撤销
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 获取商品 Repository
    fn products(&self) -> &dyn ProductRepository;

    /// 提交事务
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Unit of Work 工厂 trait
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 开始新的事务
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// 检查底层存储是否可用
    async fn ping(&self) -> AppResult<()>;
}
