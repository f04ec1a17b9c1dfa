//! HTTP 错误映射
//!
//! 领域错误在这里转换为状态码和 RFC 7807 问题详情。

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_errors::{AppError, ProblemDetails};
use thiserror::Error;
use tracing::error;

use crate::error::ProductError;

const PROBLEM_JSON: &str = "application/problem+json";

#[derive(Debug, Error)]
pub enum ApiError {
    /// 重名等请求层面的冲突
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(String),

    /// 由 axum 提取器拒绝的请求，沿用其状态码
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected { status, .. } => *status,
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "already-exists",
            Self::NotFound(_) => "not-found",
            Self::Unprocessable(_) => "validation",
            Self::Unauthorized(_) => "unauthorized",
            Self::Internal(_) => "internal",
            Self::Rejected { .. } => "bad-request",
        }
    }

    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails::new(self.status().as_u16(), self.slug(), self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!(detail = %detail, "Request failed");
        }

        let problem = self.to_problem_details();
        let mut response = (self.status(), Json(problem)).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static(PROBLEM_JSON));
        if matches!(self, Self::Unauthorized(_)) {
            headers.insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::AlreadyExists { .. } => Self::BadRequest(err.to_string()),
            ProductError::NotFound { .. } => Self::NotFound(err.to_string()),
            ProductError::Validation(msg) => Self::Unprocessable(msg),
            ProductError::Unclassified(inner) => Self::from(inner),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Unauthorized(msg) => Self::Unauthorized(msg),
            AppError::Validation(msg) => Self::Unprocessable(msg),
            AppError::Conflict(msg) => Self::BadRequest(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                Self::Unprocessable(rejection.body_text())
            }
            other => Self::Rejected {
                status: other.status(),
                detail: other.body_text(),
            },
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Unprocessable(rejection.body_text())
    }
}
