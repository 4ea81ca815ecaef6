//! Shared helpers for router-level tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use students_api::storage::Statement;
use students_api::transport::http::{create_router, AppState};
use students_api::{StoreError, Student, StudentGateway, StudentService};
use tower::ServiceExt;

pub enum Reply {
    Rows(Vec<Student>),
    Count(i64),
    Affected(u64),
    Fail(StoreError),
}

/// Gateway that answers from a script and records every statement it receives.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<Statement>>,
    healthy: bool,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::default(),
            healthy: true,
        })
    }

    pub fn unhealthy() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seen(&self) -> Vec<Statement> {
        self.seen.lock().unwrap().clone()
    }

    fn next(&self, stmt: &Statement) -> Reply {
        self.seen.lock().unwrap().push(stmt.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted statement: {}", stmt.sql))
    }
}

#[async_trait]
impl StudentGateway for ScriptedGateway {
    async fn fetch_students(&self, stmt: &Statement) -> Result<Vec<Student>, StoreError> {
        match self.next(stmt) {
            Reply::Rows(rows) => Ok(rows),
            Reply::Fail(e) => Err(e),
            _ => panic!("expected a row reply for {}", stmt.sql),
        }
    }

    async fn fetch_count(&self, stmt: &Statement) -> Result<i64, StoreError> {
        match self.next(stmt) {
            Reply::Count(n) => Ok(n),
            Reply::Fail(e) => Err(e),
            _ => panic!("expected a count reply for {}", stmt.sql),
        }
    }

    async fn execute(&self, stmt: &Statement) -> Result<u64, StoreError> {
        match self.next(stmt) {
            Reply::Affected(n) => Ok(n),
            Reply::Fail(e) => Err(e),
            _ => panic!("expected an affected-rows reply for {}", stmt.sql),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.healthy {
            Ok(())
        } else {
            Err(StoreError::Connection("connection refused".into()))
        }
    }
}

pub fn router(gateway: Arc<ScriptedGateway>) -> Router {
    create_router(AppState {
        students: StudentService::new(gateway),
    })
}

/// Sends one request through the router and returns the status and JSON body.
///
/// A body is always sent as `application/json`.
pub async fn send(
    router: Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, JsonValue) {
    let content_type = body.map(|_| "application/json");
    send_with_content_type(router, method, uri, content_type, body).await
}

/// Like [`send`], with the `content-type` header chosen by the caller (`None` omits it).
pub async fn send_with_content_type(
    router: Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            JsonValue::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

pub fn student(id: i32, first: &str, last: &str, age: i32) -> Student {
    Student {
        student_id: id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        age,
    }
}
