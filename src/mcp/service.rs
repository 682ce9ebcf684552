//! MCP service implementation using rmcp.
//!
//! This module defines the RestService struct with all PostgREST tools
//! exposed via the MCP protocol using the rmcp framework's macros.

use crate::error::RestResult;
use crate::rest::RestClient;
use crate::tools::format_json_text;
use crate::tools::query::{QueryInput, QueryToolHandler};
use crate::tools::rpc::{RpcInput, RpcToolHandler};
use crate::tools::schema::SchemaToolHandler;
use crate::tools::write::{DeleteInput, InsertInput, UpdateInput, WriteToolHandler};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct RestService {
    /// Shared PostgREST client; its rate gate paces every session of the process
    client: Arc<RestClient>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

/// Package a handler outcome for the host.
///
/// Success becomes one text block of pretty JSON. Any failure raised by a handler
/// becomes an error result carrying the message text; only arguments rejected during
/// deserialization reach the host as protocol errors.
fn tool_result(result: RestResult<JsonValue>) -> CallToolResult {
    match result {
        Ok(value) => CallToolResult::success(vec![Content::text(format_json_text(&value))]),
        Err(err) => {
            if err.is_validation() {
                debug!(error = %err, "Tool arguments rejected");
            } else {
                warn!(
                    error = %err,
                    status = err.status(),
                    suggestion = err.suggestion(),
                    "Tool call failed"
                );
            }
            CallToolResult::error(vec![Content::text(err.to_string())])
        }
    }
}

impl RestService {
    /// Create a new RestService instance.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared PostgREST client for all tool calls
    pub fn new(client: Arc<RestClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl RestService {
    #[tool(
        description = "Query rows from a table using PostgREST syntax.\nFilter format: column=operator.value (e.g. 'id=eq.5', 'name=ilike.*test*').\nOrder format: column.asc or column.desc. Limit: 1-1000, default 20."
    )]
    async fn query(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = QueryToolHandler::new(self.client.clone());
        Ok(tool_result(handler.query(input).await))
    }

    #[tool(
        description = "Insert rows into a table.\n`rows` is a JSON array of row objects given as text. Returns the inserted rows."
    )]
    async fn insert(
        &self,
        Parameters(input): Parameters<InsertInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = WriteToolHandler::new(self.client.clone());
        Ok(tool_result(handler.insert(input).await))
    }

    #[tool(
        description = "Update rows in a table.\n`filter` selects rows (e.g. 'id=eq.5'); `data` is a JSON object of fields given as text. Returns the updated rows."
    )]
    async fn update(
        &self,
        Parameters(input): Parameters<UpdateInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = WriteToolHandler::new(self.client.clone());
        Ok(tool_result(handler.update(input).await))
    }

    #[tool(
        description = "Delete rows from a table.\n`filter` selects rows (e.g. 'id=eq.5'). Returns the deleted rows."
    )]
    async fn delete(
        &self,
        Parameters(input): Parameters<DeleteInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = WriteToolHandler::new(self.client.clone());
        Ok(tool_result(handler.delete(input).await))
    }

    #[tool(
        description = "Call a Postgres function.\n`params` is a JSON object of named arguments given as text (default {})."
    )]
    async fn rpc(
        &self,
        Parameters(input): Parameters<RpcInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = RpcToolHandler::new(self.client.clone());
        Ok(tool_result(handler.call(input).await))
    }

    #[tool(
        description = "List tables (requires service key with pg_catalog access).\nBest-effort: returns whatever the PostgREST RPC root answers."
    )]
    async fn list_tables(&self) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.client.clone());
        Ok(tool_result(handler.list_tables().await))
    }
}

#[tool_handler]
impl ServerHandler for RestService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "postgrest-mcp-server".to_owned(),
                title: Some("PostgREST MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for reading and writing tables through a PostgREST (Supabase) API.\n\
                \n\
                ## Filters\n\
                Filters use `column=operator.value`, e.g. `id=eq.5`, `age=gte.18`,\n\
                `name=ilike.*smith*`, `status=in.(active,pending)`. Only the first `=`\n\
                separates column from condition.\n\
                \n\
                ## JSON arguments\n\
                `rows` (insert), `data` (update) and `params` (rpc) are JSON given as text.\n\
                \n\
                ## list_tables\n\
                Best-effort: it calls the RPC root, whose answer depends on the PostgREST\n\
                version and on the privileges of the configured key."
                    .to_string(),
            ),
        }
    }
}
