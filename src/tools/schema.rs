//! Table listing tool.
//!
//! This module implements the `list_tables` MCP tool. PostgREST has no table
//! catalogue endpoint; the tool issues `GET /rest/v1/rpc/` and returns whatever
//! the server answers. Results depend on the PostgREST version and on the
//! privileges of the configured key, so this is best-effort.

use crate::error::RestResult;
use crate::rest::{RestClient, RestRequest, Route};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

pub struct SchemaToolHandler {
    client: Arc<RestClient>,
}

impl SchemaToolHandler {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    pub fn build_list_tables_request() -> RestRequest {
        RestRequest::get(Route::RpcRoot)
    }

    pub async fn list_tables(&self) -> RestResult<JsonValue> {
        let result = self
            .client
            .execute(Self::build_list_tables_request())
            .await?;
        info!("Listed tables via RPC root");
        Ok(result)
    }
}
