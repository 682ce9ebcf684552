//! MCP tool implementations.
//!
//! This module contains all PostgREST tool handlers:
//! - `query`: Read rows with select, filter, order and limit
//! - `insert`: Insert rows into a table
//! - `update`: Update rows matching a filter
//! - `delete`: Delete rows matching a filter
//! - `rpc`: Call a Postgres function
//! - `list_tables`: Best-effort listing through the RPC root

pub mod args;
pub mod format;
pub mod query;
pub mod rpc;
pub mod schema;
pub mod write;

pub use format::format_json_text;
pub use query::{QueryInput, QueryToolHandler};
pub use rpc::{RpcInput, RpcToolHandler};
pub use schema::SchemaToolHandler;
pub use write::{DeleteInput, InsertInput, UpdateInput, WriteToolHandler};
