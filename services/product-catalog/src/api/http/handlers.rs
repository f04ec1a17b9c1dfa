//! 商品接口处理函数

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::domain::value_objects::ProductId;

use super::error::ApiError;
use super::extractors::{AppJson, AppPath, CurrentUser, DbSession};
use super::schemas::{
    CreateNewProductRequest, GetAllProductsResponse, MessageResponse, Product, ProductToUpdate,
};
use super::state::AppState;

/// POST /products
///
/// 请求体读完后才开启会话，慢客户端不会占住存储。
pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<CreateNewProductRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let session = state.sessions.begin().await?;
    state
        .service
        .create(session.as_ref(), req.into(), &user)
        .await?;
    session.commit().await?;

    Ok(Json(MessageResponse::new("Product successfully added")))
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    DbSession(session): DbSession,
) -> Result<Json<GetAllProductsResponse>, ApiError> {
    let products = state.service.list_all(session.as_ref()).await?;

    Ok(Json(GetAllProductsResponse {
        products: products.into_iter().map(Product::from).collect(),
    }))
}

/// GET /products/{product_id}
pub async fn get_product(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<ProductId>,
    DbSession(session): DbSession,
) -> Result<Json<Product>, ApiError> {
    let product = state.service.get_by_id(session.as_ref(), product_id).await?;

    Ok(Json(product.into()))
}

/// DELETE /products/{product_id}
pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<ProductId>,
    CurrentUser(user): CurrentUser,
    DbSession(session): DbSession,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .service
        .delete_by_id(session.as_ref(), product_id)
        .await?;
    session.commit().await?;

    tracing::info!(product_id = %product_id, user = %user.username, "Delete request completed");
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// PATCH /products/{product_id}
pub async fn update_product(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<ProductId>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<ProductToUpdate>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let session = state.sessions.begin().await?;
    state
        .service
        .update(session.as_ref(), product_id, req.into())
        .await?;
    session.commit().await?;

    tracing::info!(product_id = %product_id, user = %user.username, "Update request completed");
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Product updated successfully")),
    ))
}
