//! Product catalog service entry point

use std::sync::Arc;

use catalog_bootstrap::{Storage, run_http};
use product_catalog::api::http::{AppState, router};
use product_catalog::domain::UnitOfWorkFactory;
use product_catalog::infrastructure::persistence::{
    InMemoryUnitOfWorkFactory, PostgresUnitOfWorkFactory, run_migrations,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config_dir = std::env::var("CATALOG_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    run_http(&config_dir, |infra| async move {
        let sessions: Arc<dyn UnitOfWorkFactory> = match infra.storage() {
            Storage::Postgres(pool) => {
                run_migrations(&pool).await?;
                Arc::new(PostgresUnitOfWorkFactory::new(pool))
            }
            Storage::Memory => Arc::new(InMemoryUnitOfWorkFactory::new()),
        };

        let state = AppState::new(sessions, infra.token_service()).with_metrics(infra.metrics_handle());
        Ok(router(state))
    })
    .await
}
