//! 进程内 Unit of Work 实现
//!
//! 工作单元开始时复制一份已提交状态作为快照，读写都落在快照上，
//! 同时记下每个写操作。提交时在最新的已提交状态上重放这些操作，
//! 名称冲突则整个提交失败；未提交即被 drop 时什么都不写。
//! 存储锁只在复制和重放时短暂持有，工作单元之间互不阻塞。

use async_trait::async_trait;
use catalog_common::UserId;
use catalog_errors::{AppError, AppResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::entities::{NewProduct, Product, ProductChanges};
use crate::domain::repositories::ProductRepository;
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::value_objects::ProductId;
use crate::error::ProductError;

fn poisoned<T>(_: T) -> AppError {
    AppError::internal("In-memory store poisoned")
}

/// 工作单元内记录的写操作
#[derive(Debug, Clone)]
enum Change {
    Insert(Product),
    Update(ProductId, ProductChanges),
    Delete(ProductId),
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    products: BTreeMap<i64, Product>,
}

impl MemoryState {
    fn name_taken(&self, name: &str, except: Option<ProductId>) -> bool {
        self.products
            .values()
            .any(|p| p.name == name && Some(p.id) != except)
    }

    fn apply(&mut self, change: &Change) -> AppResult<()> {
        match change {
            Change::Insert(product) => {
                if self.name_taken(&product.name, None) {
                    return Err(name_conflict(&product.name));
                }
                self.products.insert(product.id.0, product.clone());
            }
            Change::Update(id, changes) => {
                if let Some(name) = &changes.name {
                    if self.name_taken(name, Some(*id)) {
                        return Err(name_conflict(name));
                    }
                }
                // 已被其他工作单元删除时与 SQL UPDATE 一样不影响任何行
                if let Some(product) = self.products.get_mut(&id.0) {
                    product.apply(changes);
                }
            }
            Change::Delete(id) => {
                self.products.remove(&id.0);
            }
        }
        Ok(())
    }
}

fn name_conflict(name: &str) -> AppError {
    AppError::conflict(
        ProductError::AlreadyExists {
            name: name.to_string(),
        }
        .to_string(),
    )
}

/// 内存 Unit of Work 工厂
#[derive(Clone, Default)]
pub struct InMemoryUnitOfWorkFactory {
    committed: Arc<Mutex<MemoryState>>,
    /// 全局 ID 序列，回滚的 ID 不再复用
    next_id: Arc<AtomicI64>,
}

impl InMemoryUnitOfWorkFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let snapshot = self.committed.lock().map_err(poisoned)?.clone();
        Ok(Box::new(InMemoryUnitOfWork {
            committed: self.committed.clone(),
            product_repo: MemoryProductRepository {
                next_id: self.next_id.clone(),
                staged: Mutex::new(Staged {
                    state: snapshot,
                    changes: Vec::new(),
                }),
            },
        }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

struct InMemoryUnitOfWork {
    committed: Arc<Mutex<MemoryState>>,
    product_repo: MemoryProductRepository,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn products(&self) -> &dyn ProductRepository {
        &self.product_repo
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let InMemoryUnitOfWork {
            committed,
            product_repo,
        } = *self;
        let changes = product_repo.staged.into_inner().map_err(poisoned)?.changes;
        if changes.is_empty() {
            return Ok(());
        }

        let mut committed = committed.lock().map_err(poisoned)?;
        let mut next = committed.clone();
        for change in &changes {
            next.apply(change)?;
        }
        *committed = next;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

struct Staged {
    state: MemoryState,
    changes: Vec<Change>,
}

impl Staged {
    fn record(&mut self, change: Change) -> AppResult<()> {
        self.state.apply(&change)?;
        self.changes.push(change);
        Ok(())
    }
}

struct MemoryProductRepository {
    next_id: Arc<AtomicI64>,
    staged: Mutex<Staged>,
}

impl MemoryProductRepository {
    fn staged(&self) -> AppResult<MutexGuard<'_, Staged>> {
        self.staged.lock().map_err(poisoned)
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self.staged()?.state.name_taken(name, None))
    }

    async fn insert(&self, product: &NewProduct, _created_by: &UserId) -> AppResult<ProductId> {
        let mut staged = self.staged()?;
        if staged.state.name_taken(&product.name, None) {
            return Err(name_conflict(&product.name));
        }

        let id = ProductId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        staged.record(Change::Insert(product.clone().into_product(id)))?;
        Ok(id)
    }

    async fn select_all(&self) -> AppResult<Vec<Product>> {
        Ok(self.staged()?.state.products.values().cloned().collect())
    }

    async fn select_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        Ok(self.staged()?.state.products.get(&id.0).cloned())
    }

    async fn update_fields(&self, id: ProductId, changes: &ProductChanges) -> AppResult<()> {
        self.staged()?.record(Change::Update(id, changes.clone()))
    }

    async fn delete_by_id(&self, id: ProductId) -> AppResult<()> {
        self.staged()?.record(Change::Delete(id))
    }
}
