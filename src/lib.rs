//! PostgREST MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to read and write tables through a PostgREST-compatible HTTP API (Supabase).

pub mod config;
pub mod error;
pub mod mcp;
pub mod rest;
pub mod tools;
pub mod transport;

pub use config::{Config, ConfigResolver};
pub use error::RestError;
pub use mcp::RestService;
pub use rest::RestClient;
