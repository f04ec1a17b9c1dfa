//! 服务错误定义

use catalog_errors::AppError;
use thiserror::Error;

use crate::domain::value_objects::ProductId;

/// 商品操作的失败分类
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with name '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("Product with id {id} not found")]
    NotFound { id: ProductId },

    #[error("{0}")]
    Validation(String),

    /// 存储或基础设施故障
    #[error(transparent)]
    Unclassified(AppError),
}

impl From<AppError> for ProductError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => ProductError::Validation(msg),
            other => ProductError::Unclassified(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ProductError>;
