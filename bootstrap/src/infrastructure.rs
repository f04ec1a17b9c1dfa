//! 基础设施资源管理
//!
//! 统一管理服务启动时创建的共享资源

use std::sync::Arc;

use catalog_adapter_postgres::connect;
use catalog_auth_core::TokenService;
use catalog_config::AppConfig;
use catalog_errors::AppResult;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::retry::{Backoff, retry_startup};

/// 进程内存储的连接串前缀
pub const MEMORY_STORAGE_SCHEME: &str = "memory://";

/// 存储后端
#[derive(Clone)]
pub enum Storage {
    /// PostgreSQL 连接池
    Postgres(PgPool),
    /// 进程内存储（本地调试）
    Memory,
}

/// 基础设施资源容器
pub struct Infrastructure {
    /// 存储后端
    storage: Storage,
    /// Token 服务
    token_service: Arc<TokenService>,
    /// Prometheus 导出句柄（可选）
    metrics: Option<PrometheusHandle>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let storage = Self::connect_storage(&config).await?;

        let token_service = Arc::new(TokenService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.expires_in as i64,
            config.jwt.issuer.clone(),
            config.jwt.audience.clone(),
        ));

        let metrics = match catalog_telemetry::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
                None
            }
        };

        Ok(Self {
            storage,
            token_service,
            metrics,
        })
    }

    async fn connect_storage(config: &AppConfig) -> AppResult<Storage> {
        let url = config.database.url.expose_secret();
        if url.starts_with(MEMORY_STORAGE_SCHEME) {
            warn!("Using in-memory storage, data is lost on restart");
            return Ok(Storage::Memory);
        }

        let max_connections = config.database.max_connections;
        let pool = retry_startup("PostgreSQL", Backoff::default(), || {
            connect(url, max_connections)
        })
        .await?;

        info!(
            "PostgreSQL connection pool created (max_connections: {})",
            config.database.max_connections
        );
        Ok(Storage::Postgres(pool))
    }

    /// 获取存储后端
    pub fn storage(&self) -> Storage {
        self.storage.clone()
    }

    /// 获取 Token 服务
    pub fn token_service(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }

    /// 获取 Prometheus 导出句柄
    pub fn metrics_handle(&self) -> Option<PrometheusHandle> {
        self.metrics.clone()
    }
}
