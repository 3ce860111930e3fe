//! In-process stub backend for client tests.
//!
//! Routes are canned `(method, path) -> (status, body)` pairs; every request
//! that reaches the stub is recorded so tests can assert on headers and
//! bodies, or on the absence of any request at all.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

#[derive(Debug, Clone)]
pub(crate) struct Seen {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct StubState {
    routes: HashMap<(Method, String), (StatusCode, String)>,
    seen: Mutex<Vec<Seen>>,
}

#[derive(Default)]
pub(crate) struct Stub {
    routes: HashMap<(Method, String), (StatusCode, String)>,
}

impl Stub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with a JSON body.
    pub fn json(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.raw(method, path, status, &body.to_string())
    }

    /// Answer `method path` with an arbitrary body string.
    pub fn raw(mut self, method: Method, path: &str, status: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.routes.insert((method, path.to_owned()), (status, body.to_owned()));
        self
    }

    /// Bind on an ephemeral port; returns the running stub.
    pub async fn spawn(self) -> RunningStub {
        let state = Arc::new(StubState { routes: self.routes, seen: Mutex::new(Vec::new()) });
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        RunningStub { base_url: format!("http://{addr}/api"), state }
    }
}

pub(crate) struct RunningStub {
    pub base_url: String,
    state: Arc<StubState>,
}

impl RunningStub {
    pub fn seen(&self) -> Vec<Seen> {
        self.state.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Seen {
        self.seen().pop().expect("no request reached the stub")
    }

    pub fn hits(&self) -> usize {
        self.state.seen.lock().unwrap().len()
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    let path = uri.path().to_owned();
    state.seen.lock().unwrap().push(Seen {
        method: method.clone(),
        path: path.clone(),
        authorization: header(AUTHORIZATION),
        content_type: header(CONTENT_TYPE),
        body: serde_json::from_slice(&body).ok(),
    });

    match state.routes.get(&(method, path)) {
        Some((status, body)) => (*status, [(CONTENT_TYPE, "application/json")], body.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/json")],
            r#"{"message":"Not found"}"#.to_owned(),
        )
            .into_response(),
    }
}
