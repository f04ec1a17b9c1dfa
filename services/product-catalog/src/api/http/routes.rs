//! 路由定义

use axum::routing::get;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use super::handlers::{create_product, delete_product, get_product, list_products, update_product};
use super::health::{health, metrics, ready};
use super::middleware::track_metrics;
use super::state::AppState;

/// 构建完整路由
///
/// 读接口公开；写接口通过 `CurrentUser` 提取器要求 Bearer token。
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{product_id}",
            get(get_product).delete(delete_product).patch(update_product),
        )
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        .route_layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
