//! Write operation tools.
//!
//! This module implements the `insert`, `update` and `delete` MCP tools. Every
//! write asks PostgREST to return the affected rows.

use crate::error::RestResult;
use crate::rest::{Filter, Prefer, RestClient, RestRequest, Route};
use crate::tools::args::{parse_object, parse_rows, require_name};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Input for the insert tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InsertInput {
    /// Table name
    pub table: String,
    /// JSON array of row objects (e.g. '[{"name":"a"}]')
    pub rows: String,
}

/// Input for the update tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateInput {
    /// Table name
    pub table: String,
    /// PostgREST filter selecting the rows to update (e.g. 'id=eq.5')
    pub filter: String,
    /// JSON object with fields to update (e.g. '{"name":"b"}')
    pub data: String,
}

/// Input for the delete tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteInput {
    /// Table name
    pub table: String,
    /// PostgREST filter selecting the rows to delete (e.g. 'id=eq.5')
    pub filter: String,
}

pub struct WriteToolHandler {
    client: Arc<RestClient>,
}

impl WriteToolHandler {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    pub fn build_insert_request(input: &InsertInput) -> RestResult<RestRequest> {
        let table = require_name("table", &input.table)?;
        let rows = parse_rows(&input.rows)?;
        Ok(RestRequest::post(Route::Table(table))
            .with_body(rows)
            .prefer(Prefer::ReturnRepresentation))
    }

    pub fn build_update_request(input: &UpdateInput) -> RestResult<RestRequest> {
        let table = require_name("table", &input.table)?;
        let filter = Filter::parse(&input.filter)?;
        let data = parse_object("data", &input.data)?;
        Ok(RestRequest::patch(Route::Table(table))
            .with_query(filter.to_params())
            .with_body(data)
            .prefer(Prefer::ReturnRepresentation))
    }

    pub fn build_delete_request(input: &DeleteInput) -> RestResult<RestRequest> {
        let table = require_name("table", &input.table)?;
        let filter = Filter::parse(&input.filter)?;
        Ok(RestRequest::delete(Route::Table(table))
            .with_query(filter.to_params())
            .prefer(Prefer::ReturnRepresentation))
    }

    pub async fn insert(&self, input: InsertInput) -> RestResult<JsonValue> {
        let request = Self::build_insert_request(&input)?;
        let result = self.client.execute(request).await?;
        info!(
            table = %input.table,
            rows_returned = result.as_array().map(Vec::len),
            "Insert executed"
        );
        Ok(result)
    }

    pub async fn update(&self, input: UpdateInput) -> RestResult<JsonValue> {
        let request = Self::build_update_request(&input)?;
        let result = self.client.execute(request).await?;
        info!(
            table = %input.table,
            rows_returned = result.as_array().map(Vec::len),
            "Update executed"
        );
        Ok(result)
    }

    pub async fn delete(&self, input: DeleteInput) -> RestResult<JsonValue> {
        let request = Self::build_delete_request(&input)?;
        let result = self.client.execute(request).await?;
        info!(
            table = %input.table,
            rows_returned = result.as_array().map(Vec::len),
            "Delete executed"
        );
        Ok(result)
    }
}
