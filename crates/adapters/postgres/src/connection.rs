//! PostgreSQL 连接

use catalog_errors::AppResult;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::error::database_error;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// 建立连接池，至少保持一个空闲连接
pub async fn connect(url: &str, max_connections: u32) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .min_connections(1)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .connect(url)
        .await
        .map_err(|e| database_error("Failed to connect to PostgreSQL", e))
}

/// 执行一次往返查询，用于就绪检查
pub async fn ping(pool: &PgPool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| database_error("PostgreSQL ping failed", e))?;
    Ok(())
}
