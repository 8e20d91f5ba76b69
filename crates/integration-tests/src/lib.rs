//! Integration tests for the Bazaar admin console.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! No external services are needed: every test starts a [`StubApi`], an
//! in-process `axum` server on an ephemeral port that plays the remote admin
//! API. It answers with canned responses and records every request so tests
//! can assert on headers and bodies.
//!
//! # Test Categories
//!
//! - `api_client` - endpoints, auth header, error extraction
//! - `store_dispatch` - slice lifecycle, submission policies, abandonment
//! - `reports` - aggregation over fetched orders
//! - `spreadsheet` - workbook import/export round trips

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use bazaar_admin::api::{ApiClient, StaticToken, TokenSource};
use bazaar_admin::config::ApiConfig;
use bazaar_admin::store::{AdminStore, SubmissionPolicy};
use secrecy::SecretString;
use serde_json::Value;

/// Canned response for one request.
#[derive(Debug, Clone)]
pub struct StubResponse {
    status: StatusCode,
    content_type: &'static str,
    body: Vec<u8>,
    delay: Option<Duration>,
}

impl StubResponse {
    /// `200 OK` with a JSON body.
    #[must_use]
    pub fn json(body: &Value) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            body: body.to_string().into_bytes(),
            delay: None,
        }
    }

    /// `200 OK` with a binary body.
    #[must_use]
    pub fn bytes(body: &[u8]) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/octet-stream",
            body: body.to_vec(),
            delay: None,
        }
    }

    /// Replace the status code.
    #[must_use]
    pub const fn status(mut self, status: u16) -> Self {
        self.status = match StatusCode::from_u16(status) {
            Ok(status) => status,
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        self
    }

    /// Hold the response back for `delay`.
    #[must_use]
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request as seen by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Text value of a multipart form field.
    #[must_use]
    pub fn multipart_field(&self, name: &str) -> Option<String> {
        let body = String::from_utf8_lossy(&self.body);
        let marker = format!("name=\"{name}\"");
        let start = body.find(&marker)?;
        let rest = body.get(start..)?;
        let value_start = rest.find("\r\n\r\n")? + 4;
        let value = rest.get(value_start..)?;
        let value_end = value.find("\r\n--")?;
        value.get(..value_end).map(str::to_string)
    }
}

#[derive(Default)]
struct StubState {
    routes: Mutex<HashMap<(Method, String), VecDeque<StubResponse>>>,
    recorded: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the remote admin API.
///
/// The server task is aborted when the stub is dropped.
pub struct StubApi {
    base_url: String,
    state: Arc<StubState>,
    handle: tokio::task::JoinHandle<()>,
}

impl StubApi {
    /// Bind an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new().fallback(answer).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Queue a response for `method path`. Queued responses are served in
    /// order; the last one keeps being served once the others are used up.
    pub fn respond(&self, method: Method, path: &str, response: StubResponse) {
        self.state
            .routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.recorded.lock().unwrap().clone()
    }

    /// Requests received for `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == *method && r.path == path)
            .collect()
    }

    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.base_url).unwrap()
    }

    /// Client authenticating with `token`, or anonymous when `None`.
    #[must_use]
    pub fn client(&self, token: Option<&str>) -> ApiClient {
        let tokens: Arc<dyn TokenSource> = match token {
            Some(token) => Arc::new(StaticToken::new(SecretString::from(token.to_string()))),
            None => Arc::new(StaticToken::anonymous()),
        };
        ApiClient::with_token_source(&self.api_config(), tokens).unwrap()
    }

    #[must_use]
    pub fn store(&self, policy: SubmissionPolicy) -> AdminStore {
        AdminStore::new(self.client(Some("test-token")), policy)
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn answer(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.recorded.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        headers,
        body,
    });

    let response = {
        let mut routes = state.routes.lock().unwrap();
        routes.get_mut(&(method, path)).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };

    let Some(response) = response else {
        return (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"success":false,"message":"Route not stubbed"}"#,
        )
            .into_response();
    };

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }

    (
        response.status,
        [(header::CONTENT_TYPE, response.content_type)],
        response.body,
    )
        .into_response()
}

/// Server-shaped order JSON with amounts `[total, discount, sgst, cgst]`.
#[must_use]
pub fn order_json(id: &str, created_at: &str, amounts: [f64; 4], items: &[(&str, &str, i64, f64)]) -> Value {
    let [total, discount, sgst, cgst] = amounts;
    let items: Vec<Value> = items
        .iter()
        .map(|(product, name, quantity, price)| {
            serde_json::json!({
                "product": product,
                "name": name,
                "quantity": quantity,
                "price": price,
            })
        })
        .collect();

    serde_json::json!({
        "_id": id,
        "orderItems": items,
        "totalPrice": total,
        "discount": discount,
        "SGST": sgst,
        "CGST": cgst,
        "createdAt": created_at,
        "orderStatus": "Processing",
    })
}
