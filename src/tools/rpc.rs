//! Remote procedure call tool.
//!
//! This module implements the `rpc` MCP tool, which calls a Postgres function
//! exposed by PostgREST under `/rest/v1/rpc/{function}`.

use crate::error::RestResult;
use crate::rest::{RestClient, RestRequest, Route};
use crate::tools::args::{parse_object, require_name};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

fn default_params() -> String {
    "{}".to_string()
}

/// Input for the rpc tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RpcInput {
    /// Name of the Postgres function to call
    #[serde(rename = "functionName")]
    pub function_name: String,
    /// JSON object of named function arguments. Default: {}
    #[serde(default = "default_params")]
    pub params: String,
}

pub struct RpcToolHandler {
    client: Arc<RestClient>,
}

impl RpcToolHandler {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    pub fn build_request(input: &RpcInput) -> RestResult<RestRequest> {
        let function = require_name("functionName", &input.function_name)?;
        let params = parse_object("params", &input.params)?;
        Ok(RestRequest::post(Route::Rpc(function)).with_body(params))
    }

    pub async fn call(&self, input: RpcInput) -> RestResult<JsonValue> {
        let request = Self::build_request(&input)?;
        let result = self.client.execute(request).await?;
        info!(function = %input.function_name, "RPC executed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use serde_json::json;

    #[test]
    fn test_rpc_input_defaults() {
        let input: RpcInput = serde_json::from_str(r#"{"functionName": "get_stats"}"#).unwrap();
        assert_eq!(input.function_name, "get_stats");
        assert_eq!(input.params, "{}");
    }

    #[test]
    fn test_rpc_input_uses_camel_case_name() {
        let result: Result<RpcInput, _> = serde_json::from_str(r#"{"function_name": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rpc_request_sends_default_empty_object() {
        let input = RpcInput {
            function_name: "get_stats".to_string(),
            params: default_params(),
        };
        let request = RpcToolHandler::build_request(&input).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path_and_query(), "/rest/v1/rpc/get_stats");
        assert_eq!(request.body, Some(json!({})));
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_rpc_request_with_params() {
        let input = RpcInput {
            function_name: "search".to_string(),
            params: r#"{"term":"rust","max":5}"#.to_string(),
        };
        let request = RpcToolHandler::build_request(&input).unwrap();
        assert_eq!(request.body, Some(json!({ "term": "rust", "max": 5 })));
    }

    #[test]
    fn test_rpc_rejects_malformed_params() {
        let input = RpcInput {
            function_name: "search".to_string(),
            params: "{term".to_string(),
        };
        let err = RpcToolHandler::build_request(&input).unwrap_err();
        assert!(err.to_string().contains("params is not valid JSON"));
    }

    #[test]
    fn test_rpc_rejects_blank_function_name() {
        let input = RpcInput {
            function_name: "".to_string(),
            params: default_params(),
        };
        assert!(RpcToolHandler::build_request(&input).unwrap_err().is_validation());
    }
}
