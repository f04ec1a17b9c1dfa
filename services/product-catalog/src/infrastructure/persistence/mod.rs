//! 持久化实现
//!
//! - PostgreSQL：每个工作单元对应一个数据库事务
//! - 内存：进程内存储，用于本地调试和测试

mod memory;
mod migrations;
mod postgres;
mod rows;

pub use memory::InMemoryUnitOfWorkFactory;
pub use migrations::{MIGRATIONS, run_migrations};
pub use postgres::{PostgresUnitOfWork, PostgresUnitOfWorkFactory, TxProductRepository};
