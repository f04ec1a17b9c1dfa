//! PostgreSQL Unit of Work 实现
//!
//! 使用 SQLx Transaction 提供事务协调能力。

use async_trait::async_trait;
use catalog_adapter_postgres::{database_error, is_unique_violation, ping as ping_pool};
use catalog_common::UserId;
use catalog_errors::{AppError, AppResult};
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::{NewProduct, Product, ProductChanges};
use crate::domain::repositories::ProductRepository;
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::value_objects::ProductId;

use super::rows::ProductRow;

/// 共享事务类型
type SharedTx = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock";

/// PostgreSQL Unit of Work 工厂
#[derive(Clone)]
pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("Failed to begin transaction", e))?;

        Ok(Box::new(PostgresUnitOfWork::new(tx)))
    }

    async fn ping(&self) -> AppResult<()> {
        ping_pool(&self.pool).await
    }
}

/// PostgreSQL Unit of Work 实现
///
/// 持有事务和事务感知的 Repository；drop 时若事务尚未提交，sqlx 会自动回滚。
pub struct PostgresUnitOfWork {
    tx: SharedTx,
    product_repo: TxProductRepository,
}

impl PostgresUnitOfWork {
    fn new(tx: Transaction<'static, Postgres>) -> Self {
        let tx = Arc::new(Mutex::new(Some(tx)));
        Self {
            product_repo: TxProductRepository::new(tx.clone()),
            tx,
        }
    }

    async fn take_tx(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.tx
            .lock()
            .await
            .take()
            .ok_or_else(|| AppError::internal("Transaction consumed"))
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn products(&self) -> &dyn ProductRepository {
        &self.product_repo
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.take_tx()
            .await?
            .commit()
            .await
            .map_err(|e| database_error("Failed to commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.take_tx()
            .await?
            .rollback()
            .await
            .map_err(|e| database_error("Failed to rollback transaction", e))
    }
}

/// 事务感知的商品 Repository
pub struct TxProductRepository {
    tx: SharedTx,
}

impl TxProductRepository {
    pub fn new(tx: SharedTx) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ProductRepository for TxProductRepository {
    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE name = $1)")
            .bind(name)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| database_error("Failed to check product name", e))
    }

    async fn insert(&self, product: &NewProduct, created_by: &UserId) -> AppResult<ProductId> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products (name, description, price, stock, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(created_by.0)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Product name '{}' is taken", product.name))
            } else {
                database_error("Failed to insert product", e)
            }
        })?;

        Ok(ProductId(id))
    }

    async fn select_all(&self) -> AppResult<Vec<Product>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let sql = format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS);
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&mut **tx)
            .await
            .map_err(|e| database_error("Failed to list products", e))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn select_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id.0)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| database_error("Failed to find product", e))?;

        Ok(row.map(Product::from))
    }

    async fn update_fields(&self, id: ProductId, changes: &ProductChanges) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        // NULL 参数表示该字段未提供
        sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(changes.stock)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Product name is taken (id {})", id))
            } else {
                database_error("Failed to update product", e)
            }
        })?;

        Ok(())
    }

    async fn delete_by_id(&self, id: ProductId) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.0)
            .execute(&mut **tx)
            .await
            .map_err(|e| database_error("Failed to delete product", e))?;

        Ok(())
    }
}
