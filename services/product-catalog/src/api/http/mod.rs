//! HTTP API

mod error;
mod extractors;
mod handlers;
mod health;
mod middleware;
mod routes;
mod schemas;
mod state;

pub use error::ApiError;
pub use extractors::{AppJson, AppPath, CurrentUser, DbSession};
pub use routes::router;
pub use schemas::*;
pub use state::AppState;
