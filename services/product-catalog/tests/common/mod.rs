//! 集成测试辅助

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, header};
use axum::Router;
use catalog_auth_core::TokenService;
use catalog_common::UserId;
use product_catalog::api::http::{AppState, router};
use product_catalog::domain::UnitOfWorkFactory;
use product_catalog::infrastructure::persistence::InMemoryUnitOfWorkFactory;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(
        SECRET,
        3600,
        "catalog-auth".to_string(),
        "catalog-api".to_string(),
    ))
}

pub struct TestApp {
    pub router: Router,
    pub tokens: Arc<TokenService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_sessions(Arc::new(InMemoryUnitOfWorkFactory::new()))
    }

    pub fn with_sessions(sessions: Arc<dyn UnitOfWorkFactory>) -> Self {
        let tokens = token_service();
        let state = AppState::new(sessions, tokens.clone());
        Self {
            router: router(state),
            tokens,
        }
    }

    pub fn bearer(&self) -> String {
        let token = self
            .tokens
            .generate_access_token(&UserId::new(), "alice")
            .unwrap();
        format!("Bearer {}", token)
    }

    pub async fn send(&self, request: Request<Body>) -> (u16, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        read_json(response).await
    }

    pub async fn get(&self, uri: &str) -> (u16, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (u16, Value) {
        let request = Request::post(uri)
            .header(header::AUTHORIZATION, self.bearer())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (u16, Value) {
        let request = Request::patch(uri)
            .header(header::AUTHORIZATION, self.bearer())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> (u16, Value) {
        let request = Request::delete(uri)
            .header(header::AUTHORIZATION, self.bearer())
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }
}

pub async fn read_json(response: Response<Body>) -> (u16, Value) {
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
