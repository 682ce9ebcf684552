//! HTTP client for the PostgREST API.
//!
//! Every request resolves the remote configuration, passes the shared rate gate,
//! and is sent with the credential attached both as `apikey` and as a bearer token.

use crate::config::{Config, ConfigResolver};
use crate::error::{RestError, RestResult};
use crate::rest::rate_gate::RateGate;
use crate::rest::request::RestRequest;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const APIKEY_HEADER: &str = "apikey";

pub struct RestClient {
    http: reqwest::Client,
    resolver: ConfigResolver,
    rate_gate: RateGate,
}

impl RestClient {
    /// Create a client.
    ///
    /// # Arguments
    ///
    /// * `resolver` - Source of the base URL and credential, consulted per request
    /// * `min_interval` - Minimum spacing between two outbound requests
    /// * `timeout` - Optional per-request timeout; reqwest's default (none) otherwise
    pub fn new(
        resolver: ConfigResolver,
        min_interval: Duration,
        timeout: Option<Duration>,
    ) -> RestResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| RestError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_http_client(http, resolver, min_interval))
    }

    /// Create a client around an already configured reqwest client.
    pub fn with_http_client(
        http: reqwest::Client,
        resolver: ConfigResolver,
        min_interval: Duration,
    ) -> Self {
        Self {
            http,
            resolver,
            rate_gate: RateGate::new(min_interval),
        }
    }

    /// Create a client reading the remote configuration from the process environment.
    pub fn from_config(config: &Config) -> RestResult<Self> {
        Self::new(
            ConfigResolver::from_env(),
            config.rate_limit_duration(),
            config.request_timeout_duration(),
        )
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    /// Execute one request and return the decoded JSON body.
    ///
    /// An empty success body yields `{}`. Configuration problems fail before the
    /// rate gate is touched, so a misconfigured server never sends anything.
    pub async fn execute(&self, request: RestRequest) -> RestResult<JsonValue> {
        let remote = self.resolver.resolve()?;
        let url = request.url(&remote.base_url);
        let headers = build_headers(&remote.credential, &request.headers)?;
        let body = request
            .body
            .as_ref()
            .map(|body| serde_json::to_string(body))
            .transpose()
            .map_err(|e| RestError::validation(format!("Failed to serialize body: {}", e)))?;

        self.rate_gate.admit().await;

        debug!(
            method = %request.method,
            path = %request.path_and_query(),
            has_body = body.is_some(),
            "Sending PostgREST request"
        );

        let start = Instant::now();
        let mut builder = self.http.request(request.method.clone(), url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.inspect_err(|e| {
            warn!(method = %request.method, error = %e, "PostgREST request failed to send");
        })?;
        let status = response.status();

        if !status.is_success() {
            // An unreadable error body must not hide the status
            let text = response.text().await.unwrap_or_default();
            let elapsed_ms = start.elapsed().as_millis() as u64;
            warn!(
                method = %request.method,
                status = status.as_u16(),
                elapsed_ms = elapsed_ms,
                "PostgREST returned an error status"
            );
            return Err(RestError::http(status.as_u16(), &text));
        }

        let text = response.text().await?;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            method = %request.method,
            status = status.as_u16(),
            elapsed_ms = elapsed_ms,
            "PostgREST request completed"
        );

        parse_body(&text)
    }
}

/// Default headers merged with `extra`; extra headers replace defaults of the same name.
fn build_headers(credential: &str, extra: &[(String, String)]) -> RestResult<HeaderMap> {
    let invalid_credential =
        || RestError::configuration("API key contains characters not allowed in an HTTP header");

    let mut apikey = HeaderValue::from_str(credential).map_err(|_| invalid_credential())?;
    apikey.set_sensitive(true);
    let mut bearer =
        HeaderValue::from_str(&format!("Bearer {}", credential)).map_err(|_| invalid_credential())?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(APIKEY_HEADER), apikey);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in extra {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| RestError::validation(format!("Invalid header name '{}'", name)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| RestError::validation(format!("Invalid value for header '{}'", name)))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// Decode a success body. Empty text becomes an empty object.
pub fn parse_body(text: &str) -> RestResult<JsonValue> {
    if text.is_empty() {
        return Ok(JsonValue::Object(serde_json::Map::new()));
    }
    serde_json::from_str(text).map_err(|e| RestError::malformed_response(e.to_string()))
}
