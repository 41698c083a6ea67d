//! Local HTTP fakes for the hosted store, auth service and provider.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, MethodRouter};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;

/// Serves `app` on a random local port for the lifetime of the test runtime.
pub(crate) async fn spawn_app(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Value,
}

impl RecordedRequest {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Captures every request routed to a canned responder.
#[derive(Debug, Clone, Default)]
pub(crate) struct Recorded {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[derive(Clone)]
struct Canned {
    recorded: Recorded,
    status: StatusCode,
    body: String,
}

impl Recorded {
    /// Route that answers any method with `status` and a JSON `body`.
    pub(crate) fn respond(&self, status: StatusCode, body: Value) -> MethodRouter {
        self.respond_raw(status, body.to_string())
    }

    /// Route that answers any method with `status` and a verbatim body.
    pub(crate) fn respond_raw(&self, status: StatusCode, body: impl Into<String>) -> MethodRouter {
        any(canned).with_state(Canned {
            recorded: self.clone(),
            status,
            body: body.into(),
        })
    }

    pub(crate) fn count(&self) -> usize {
        self.requests.lock().expect("lock").len()
    }

    pub(crate) fn last(&self) -> Option<RecordedRequest> {
        self.requests.lock().expect("lock").last().cloned()
    }
}

async fn canned(
    State(canned): State<Canned>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body_json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    canned
        .recorded
        .requests
        .lock()
        .expect("lock")
        .push(RecordedRequest {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers,
            body: body_json,
        });
    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
        .into_response()
}
