//! Test helper utilities for webserver integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use shared::UserId;
use tower::ServiceExt;

use learning_server::web::auth::CALLER_HEADER;
use learning_server::web::{ApiState, build_router};
use learning_server::{AppServices, Database, WebServerState};

/// Router over a fresh in-memory database, plus direct service access for setup
pub struct TestApp {
    pub router: Router,
    pub services: AppServices,
    pub server: Arc<WebServerState>,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("in-memory database");
        Self::with_services(AppServices::from_database(db))
    }

    pub fn with_services(services: AppServices) -> Self {
        let server = Arc::new(WebServerState::new("127.0.0.1:0".parse().unwrap()));
        let router = build_router(ApiState {
            services: services.clone(),
            server: Arc::clone(&server),
        });
        Self { router, services, server }
    }

    /// Send one request through the router and decode the JSON reply
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        caller: Option<&UserId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = caller {
            builder = builder.header(CALLER_HEADER, id.as_str());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, caller: Option<&UserId>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, caller, None).await
    }

    pub async fn post(&self, uri: &str, caller: &UserId, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(caller), Some(body)).await
    }

    pub async fn put(&self, uri: &str, caller: &UserId, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(caller), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, caller: &UserId) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(caller), None).await
    }
}
