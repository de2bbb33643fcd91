// SPDX-License-Identifier: PMPL-1.0-or-later
//! In-process stand-in for an AtoM server.
//!
//! Runs an axum router on its own tokio runtime in a background thread so the
//! blocking client under test can talk to it from ordinary `#[test]`s.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use tokio::sync::oneshot;

pub const COLLECTION: &str = "/api/informationobjects";

/// One request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone, Default)]
struct MockState {
    /// Per-path response queue. The last entry is sticky.
    routes: Arc<Mutex<HashMap<String, VecDeque<(StatusCode, String)>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockAtom {
    addr: SocketAddr,
    state: MockState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockAtom {
    /// Start a server whose probe endpoint answers `200 {"results": []}`.
    pub fn start() -> Self {
        let mock = Self::start_empty();
        mock.respond(COLLECTION, 200, serde_json::json!({ "total": 0, "results": [] }));
        mock
    }

    /// Start a server with no routes; every path answers 404.
    pub fn start_empty() -> Self {
        let state = MockState::default();
        let server_state = state.clone();
        let (addr_tx, addr_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("mock runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind mock server");
                addr_tx
                    .send(listener.local_addr().expect("mock address"))
                    .expect("report mock address");
                let app = Router::new().fallback(handle).with_state(server_state);
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("mock server");
            });
        });

        let addr = addr_rx.recv().expect("mock server did not start");
        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    /// `host:port` to hand to the client as its server.
    pub fn server(&self) -> String {
        self.addr.to_string()
    }

    /// Answer every request to `path` with `status` and a JSON body.
    pub fn respond(&self, path: &str, status: u16, body: Value) {
        self.respond_raw(path, status, &body.to_string());
    }

    /// Answer every request to `path` with `status` and a literal body.
    pub fn respond_raw(&self, path: &str, status: u16, body: &str) {
        let mut routes = self.state.routes.lock().unwrap();
        routes.insert(path.to_owned(), VecDeque::from([(code(status), body.to_owned())]));
    }

    /// Queue a further response for `path`, used once the earlier ones are spent.
    pub fn then_respond(&self, path: &str, status: u16, body: Value) {
        let mut routes = self.state.routes.lock().unwrap();
        routes
            .entry(path.to_owned())
            .or_default()
            .push_back((code(status), body.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }
}

impl Drop for MockAtom {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).expect("valid status code")
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let query = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_owned(),
        query,
        headers,
    });

    let next = {
        let mut routes = state.routes.lock().unwrap();
        routes.get_mut(uri.path()).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };

    match next {
        Some((status, body)) => {
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        None => (StatusCode::NOT_FOUND, "{}").into_response(),
    }
}
