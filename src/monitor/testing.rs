//! Test doubles: a fake monitored service, push gateway and paging endpoint
//! served from one local axum router, and a recording alert sink.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::alerts::{AlertEvent, AlertSink, Severity};

struct Canned {
    status: StatusCode,
    body: String,
}

impl Canned {
    fn json(value: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: value.to_string(),
        }
    }

    fn respond(&self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body.clone(),
        )
            .into_response()
    }
}

#[derive(Debug, Clone)]
pub struct RecordedPush {
    pub job: String,
    pub body: String,
}

struct FakeState {
    violations: Mutex<Canned>,
    queue_size: Mutex<Canned>,
    integrity: Mutex<Canned>,
    push_status: Mutex<StatusCode>,
    pager_status: Mutex<StatusCode>,
    pushes: Mutex<Vec<RecordedPush>>,
    pages: Mutex<Vec<Value>>,
}

impl FakeState {
    fn new() -> Self {
        Self {
            violations: Mutex::new(Canned::json(Value::Array(vec![]))),
            queue_size: Mutex::new(Canned::json(serde_json::json!({"size": 0}))),
            integrity: Mutex::new(Canned::json(serde_json::json!({"balanced": true}))),
            push_status: Mutex::new(StatusCode::OK),
            pager_status: Mutex::new(StatusCode::ACCEPTED),
            pushes: Mutex::new(Vec::new()),
            pages: Mutex::new(Vec::new()),
        }
    }
}

async fn violations(State(state): State<Arc<FakeState>>) -> Response {
    state.violations.lock().respond()
}

async fn queue_size(State(state): State<Arc<FakeState>>) -> Response {
    state.queue_size.lock().respond()
}

async fn integrity(State(state): State<Arc<FakeState>>) -> Response {
    state.integrity.lock().respond()
}

async fn push_metrics(
    State(state): State<Arc<FakeState>>,
    Path(job): Path<String>,
    body: String,
) -> StatusCode {
    state.pushes.lock().push(RecordedPush { job, body });
    *state.push_status.lock()
}

async fn enqueue_page(State(state): State<Arc<FakeState>>, Json(page): Json<Value>) -> StatusCode {
    state.pages.lock().push(page);
    *state.pager_status.lock()
}

/// Local stand-in for every HTTP collaborator of the monitor
pub struct FakeService {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeService {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::new());

        let router = Router::new()
            .route("/api/v1/admin/compliance/violations", get(violations))
            .route("/api/v1/admin/kyc/queue/size", get(queue_size))
            .route("/api/v1/admin/financial/integrity", get(integrity))
            .route("/metrics/job/:job", put(push_metrics))
            .route("/v2/enqueue", post(enqueue_page))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn pager_url(&self) -> String {
        format!("http://{}/v2/enqueue", self.addr)
    }

    pub fn set_violations(&self, value: Value) {
        *self.state.violations.lock() = Canned::json(value);
    }

    pub fn set_raw_violations(&self, status: StatusCode, body: &str) {
        *self.state.violations.lock() = Canned {
            status,
            body: body.to_string(),
        };
    }

    pub fn set_queue_size(&self, size: i64) {
        *self.state.queue_size.lock() = Canned::json(serde_json::json!({ "size": size }));
    }

    pub fn set_raw_queue_size(&self, status: StatusCode, body: &str) {
        *self.state.queue_size.lock() = Canned {
            status,
            body: body.to_string(),
        };
    }

    pub fn set_integrity(&self, value: Value) {
        *self.state.integrity.lock() = Canned::json(value);
    }

    pub fn set_push_status(&self, status: StatusCode) {
        *self.state.push_status.lock() = status;
    }

    pub fn set_pager_status(&self, status: StatusCode) {
        *self.state.pager_status.lock() = status;
    }

    pub fn pushes(&self) -> Vec<RecordedPush> {
        self.state.pushes.lock().clone()
    }

    pub fn pages(&self) -> Vec<Value> {
        self.state.pages.lock().clone()
    }
}

/// Sink that keeps everything it receives
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AlertEvent>>,
    errors: Mutex<Vec<String>>,
    flushed: AtomicBool,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().clone()
    }

    pub fn events_with(&self, severity: Severity) -> Vec<AlertEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.severity == severity)
            .cloned()
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn flushed(&self) -> bool {
        self.flushed.load(Ordering::SeqCst)
    }
}

impl AlertSink for RecordingSink {
    fn capture_event(&self, event: AlertEvent) {
        self.events.lock().push(event);
    }

    fn capture_error(&self, error: &(dyn Error + 'static)) {
        self.errors.lock().push(error.to_string());
    }

    fn flush(&self, _timeout: Duration) -> bool {
        self.flushed.store(true, Ordering::SeqCst);
        true
    }
}
