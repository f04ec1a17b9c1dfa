//! 请求提取器

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use catalog_auth_core::{AuthUser, bearer_token};
use tracing::{debug, warn};

use crate::domain::unit_of_work::UnitOfWork;

use super::error::ApiError;
use super::state::AppState;

/// 已认证的调用者
///
/// 从 `Authorization: Bearer <jwt>` 解析；缺失或无效时在处理函数运行前返回 401。
pub struct CurrentUser(pub AuthUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                warn!("Missing authorization header");
                ApiError::Unauthorized("Not authenticated".to_string())
            })?;

        let token = bearer_token(header).ok_or_else(|| {
            warn!("Unsupported authorization scheme");
            ApiError::Unauthorized("Not authenticated".to_string())
        })?;

        let user = state.tokens.resolve_user(token).map_err(|e| {
            warn!(error = %e, "Token validation failed");
            ApiError::Unauthorized("Could not validate credentials".to_string())
        })?;

        debug!(user_id = %user.id, username = %user.username, "Token validated successfully");
        Ok(CurrentUser(user))
    }
}

/// 请求级数据库会话
///
/// 处理函数成功后显式提交；未提交即 drop 时回滚。
pub struct DbSession(pub Box<dyn UnitOfWork>);

impl FromRequestParts<AppState> for DbSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let uow = state.sessions.begin().await?;
        Ok(DbSession(uow))
    }
}

/// 拒绝时返回问题详情的 JSON 提取器
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// 拒绝时返回问题详情的路径参数提取器
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);
