//! 启动时执行的版本化迁移
//!
//! 已执行的版本记录在 `_migrations` 表中，连同 SQL 的 SHA-256。
//! 已执行迁移的 SQL 被改动时拒绝启动。

use std::collections::HashMap;

use catalog_errors::{AppError, AppResult};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::info;

use crate::error::database_error;

const HISTORY_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS _migrations (
    version    BIGINT PRIMARY KEY,
    name       VARCHAR(255) NOT NULL,
    checksum   CHAR(64) NOT NULL,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// 一个迁移步骤
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: &'static str,
}

impl Migration {
    /// SQL 文本的 SHA-256（小写十六进制）
    pub fn checksum(&self) -> String {
        format!("{:x}", Sha256::digest(self.sql.as_bytes()))
    }
}

/// 按版本升序挑出尚未执行的迁移
fn pending<'a>(
    applied: &HashMap<i64, String>,
    migrations: &'a [Migration],
) -> AppResult<Vec<&'a Migration>> {
    let mut todo = Vec::new();
    for migration in migrations {
        match applied.get(&migration.version) {
            Some(checksum) if *checksum != migration.checksum() => {
                return Err(AppError::internal(format!(
                    "Migration {} ({}) was modified after it was applied",
                    migration.version, migration.name
                )));
            }
            Some(_) => {}
            None => todo.push(migration),
        }
    }
    todo.sort_by_key(|m| m.version);
    Ok(todo)
}

/// 执行尚未执行的迁移，返回本次执行的版本号
///
/// 每个迁移与它的历史记录在同一事务中提交。
pub async fn apply_migrations(pool: &PgPool, migrations: &[Migration]) -> AppResult<Vec<i64>> {
    sqlx::raw_sql(HISTORY_TABLE_DDL)
        .execute(pool)
        .await
        .map_err(|e| database_error("Failed to create migration history", e))?;

    let applied: HashMap<i64, String> =
        sqlx::query_as::<_, (i64, String)>("SELECT version, checksum FROM _migrations")
            .fetch_all(pool)
            .await
            .map_err(|e| database_error("Failed to read migration history", e))?
            .into_iter()
            .collect();

    let mut done = Vec::new();
    for migration in pending(&applied, migrations)? {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| database_error("Failed to begin migration", e))?;

        sqlx::raw_sql(migration.sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| database_error(&format!("Migration {} failed", migration.version), e))?;

        sqlx::query("INSERT INTO _migrations (version, name, checksum) VALUES ($1, $2, $3)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(migration.checksum())
            .execute(&mut *tx)
            .await
            .map_err(|e| database_error("Failed to record migration", e))?;

        tx.commit()
            .await
            .map_err(|e| database_error("Failed to commit migration", e))?;

        info!(version = migration.version, name = migration.name, "Migration applied");
        done.push(migration.version);
    }

    Ok(done)
}
