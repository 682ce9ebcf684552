//! PostgREST access layer.
//!
//! This module provides everything needed to talk to a PostgREST endpoint:
//! - Request model (routes, query parameters, `Prefer` headers)
//! - Filter translation from `column=operator.value` expressions
//! - Process-wide request pacing
//! - The HTTP client that executes requests and classifies failures

pub mod client;
pub mod filter;
pub mod rate_gate;
pub mod request;

pub use client::RestClient;
pub use filter::Filter;
pub use rate_gate::RateGate;
pub use request::{Prefer, QueryParams, RestRequest, Route};
