//! sqlx 错误辅助

use catalog_errors::AppError;

/// 是否为唯一约束冲突（SQLSTATE 23505）
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

/// 把 sqlx 错误包装为带上下文的数据库错误
pub fn database_error(context: &str, err: sqlx::Error) -> AppError {
    AppError::database(format!("{}: {}", context, err))
}
