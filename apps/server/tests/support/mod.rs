pub mod assertions;
pub mod fixtures;

use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use hireboard::{api::create_router, db::MemoryStore, AppState, Config};
use serde_json::Value;
use tower::ServiceExt as _;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        Self::new_with_config(|_| {}).await
    }

    pub async fn new_with_config(configure: impl FnOnce(&mut Config)) -> anyhow::Result<Self> {
        let mut config = Config::default();
        configure(&mut config);

        let store = MemoryStore::from_seed(seed()).context("seed memory store")?;
        let state = AppState::with_executor(config, Arc::new(store))
            .context("initialize AppState")?;
        let router = create_router(state.clone());

        Ok(Self { router, state })
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Value)> {
        let request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .header("accept", "application/json")
            .body(Body::empty())
            .context("build request")?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).context("parse response body as JSON")?
        };

        Ok((status, headers, json))
    }

    pub async fn get(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _headers, body) = self.request(Method::GET, path_and_query).await?;
        Ok((status, body))
    }
}
