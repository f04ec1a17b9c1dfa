//! 数据库迁移

use catalog_adapter_postgres::{Migration, apply_migrations};
use catalog_errors::AppResult;
use sqlx::PgPool;
use tracing::info;

/// 本服务的全部迁移，版本号只增不改
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_products",
    sql: r#"
CREATE TABLE IF NOT EXISTS products (
    id          BIGSERIAL PRIMARY KEY,
    name        VARCHAR(255) NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    price       NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
    stock       INTEGER NOT NULL CHECK (stock >= 0),
    created_by  UUID,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT products_name_key UNIQUE (name)
);
"#,
}];

/// 启动时应用待执行的迁移
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    let applied = apply_migrations(pool, MIGRATIONS).await?;
    info!(applied = ?applied, known = MIGRATIONS.len(), "Database schema up to date");
    Ok(())
}
