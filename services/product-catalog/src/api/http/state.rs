//! 路由共享状态

use std::sync::Arc;

use catalog_auth_core::TokenService;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::application::ProductService;
use crate::domain::unit_of_work::UnitOfWorkFactory;

#[derive(Clone)]
pub struct AppState {
    pub service: ProductService,
    pub sessions: Arc<dyn UnitOfWorkFactory>,
    pub tokens: Arc<TokenService>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(sessions: Arc<dyn UnitOfWorkFactory>, tokens: Arc<TokenService>) -> Self {
        Self {
            service: ProductService::new(),
            sessions,
            tokens,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}
