//! In-process PostgREST stand-in for integration tests.
//!
//! Records every request it receives and answers with a scripted status and body.

#![allow(dead_code)]

use axum::Router;
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use postgrest_mcp_server::config::ConfigResolver;
use postgrest_mcp_server::rest::RestClient;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

pub const TEST_KEY: &str = "test-service-key";

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub received_at: Instant,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    status: StatusCode,
    body: Arc<String>,
}

pub struct MockPostgrest {
    pub base_url: String,
    state: MockState,
}

impl MockPostgrest {
    /// Start a server answering every request with `status` and `body`.
    pub async fn start(status: u16, body: &str) -> Self {
        let state = MockState {
            requests: Arc::new(Mutex::new(Vec::new())),
            status: StatusCode::from_u16(status).unwrap(),
            body: Arc::new(body.to_string()),
        };

        let app = Router::new().fallback(capture).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> CapturedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }

    /// Client pointed at this server, with the given rate limit interval.
    pub fn client_with_interval(&self, min_interval: Duration) -> Arc<RestClient> {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        Arc::new(RestClient::with_http_client(
            http,
            ConfigResolver::fixed(&self.base_url, TEST_KEY),
            min_interval,
        ))
    }

    pub fn client(&self) -> Arc<RestClient> {
        self.client_with_interval(Duration::from_millis(100))
    }
}

async fn capture(State(state): State<MockState>, request: Request) -> Response {
    let received_at = Instant::now();
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    state.requests.lock().unwrap().push(CapturedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(String::from),
        headers,
        body: body.to_vec(),
        received_at,
    });

    (state.status, state.body.as_str().to_string()).into_response()
}
