//! Query tool.
//!
//! This module implements the `query` MCP tool, which reads rows from a table or
//! view with PostgREST `select`, filter, `order` and `limit` parameters.

use crate::error::{RestError, RestResult};
use crate::rest::{Prefer, QueryParams, RestClient, RestRequest, Route, filter};
use crate::tools::args::require_name;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_SELECT: &str = "*";
pub const DEFAULT_LIMIT: i64 = 20;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 1000;

fn default_select() -> String {
    DEFAULT_SELECT.to_string()
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Input for the query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// Table or view name
    pub table: String,
    /// Columns to return in PostgREST select syntax (e.g. 'id,name,orders(total)'). Default: *
    #[serde(default = "default_select")]
    pub select: String,
    /// PostgREST filter (e.g. 'id=eq.5', 'name=ilike.*test*')
    #[serde(default)]
    pub filter: Option<String>,
    /// Sort order (e.g. 'created_at.desc')
    #[serde(default)]
    pub order: Option<String>,
    /// Maximum rows to return. Default: 20, min: 1, max: 1000
    #[serde(default = "default_limit")]
    #[schemars(range(min = 1, max = 1000))]
    pub limit: i64,
}

impl QueryInput {
    /// Create input for `table` with every other argument at its default.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: default_select(),
            filter: None,
            order: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

pub struct QueryToolHandler {
    client: Arc<RestClient>,
}

impl QueryToolHandler {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    /// Validate the input and build the GET request.
    pub fn build_request(input: &QueryInput) -> RestResult<RestRequest> {
        let table = require_name("table", &input.table)?;

        if !(MIN_LIMIT..=MAX_LIMIT).contains(&input.limit) {
            return Err(RestError::validation(format!(
                "limit must be between {} and {}, got {}",
                MIN_LIMIT, MAX_LIMIT, input.limit
            )));
        }

        let mut params = QueryParams::new();
        params.set("select", &input.select);
        params.set("limit", input.limit.to_string());
        filter::apply(&mut params, input.filter.as_deref())?;
        if let Some(order) = &input.order {
            params.set("order", order);
        }

        Ok(RestRequest::get(Route::Table(table))
            .with_query(params)
            .prefer(Prefer::CountExact))
    }

    pub async fn query(&self, input: QueryInput) -> RestResult<JsonValue> {
        let request = Self::build_request(&input)?;
        let result = self.client.execute(request).await?;

        info!(
            table = %input.table,
            row_count = result.as_array().map(Vec::len),
            "Query executed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[test]
    fn test_query_input_defaults() {
        let input: QueryInput = serde_json::from_str(r#"{"table": "users"}"#).unwrap();
        assert_eq!(input.table, "users");
        assert_eq!(input.select, "*");
        assert_eq!(input.limit, 20);
        assert!(input.filter.is_none());
        assert!(input.order.is_none());
    }

    #[test]
    fn test_query_input_rejects_string_limit() {
        let result: Result<QueryInput, _> =
            serde_json::from_str(r#"{"table": "users", "limit": "ten"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_query_input_requires_table() {
        let result: Result<QueryInput, _> = serde_json::from_str(r#"{"limit": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_request_with_filter() {
        let input = QueryInput {
            filter: Some("id=eq.5".to_string()),
            limit: 10,
            ..QueryInput::new("users")
        };
        let request = QueryToolHandler::build_request(&input).unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.path_and_query(),
            "/rest/v1/users?select=*&limit=10&id=eq.5"
        );
        assert_eq!(
            request.headers,
            vec![("Prefer".to_string(), "count=exact".to_string())]
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn test_build_request_with_order() {
        let input = QueryInput {
            select: "id,name".to_string(),
            order: Some("created_at.desc".to_string()),
            ..QueryInput::new("users")
        };
        let request = QueryToolHandler::build_request(&input).unwrap();
        assert_eq!(request.query.get("order"), Some("created_at.desc"));
        assert_eq!(request.query.get("select"), Some("id,name"));
        assert_eq!(request.query.get("limit"), Some("20"));
    }

    #[test]
    fn test_build_request_limit_bounds() {
        for limit in [1, 500, 1000] {
            let input = QueryInput {
                limit,
                ..QueryInput::new("users")
            };
            let request = QueryToolHandler::build_request(&input).unwrap();
            assert_eq!(request.query.get("limit"), Some(limit.to_string().as_str()));
        }

        for limit in [0, -1, 1001] {
            let input = QueryInput {
                limit,
                ..QueryInput::new("users")
            };
            let err = QueryToolHandler::build_request(&input).unwrap_err();
            assert!(err.is_validation());
            assert!(err.to_string().contains("between 1 and 1000"));
        }
    }

    #[test]
    fn test_build_request_rejects_bad_filter() {
        let input = QueryInput {
            filter: Some("no-equals-sign".to_string()),
            ..QueryInput::new("users")
        };
        assert!(QueryToolHandler::build_request(&input).unwrap_err().is_validation());
    }

    #[test]
    fn test_build_request_rejects_blank_table() {
        let err = QueryToolHandler::build_request(&QueryInput::new(" ")).unwrap_err();
        assert!(err.is_validation());
    }
}
