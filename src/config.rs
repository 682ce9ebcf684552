//! Configuration handling for the PostgREST MCP Server.
//!
//! Server options come from CLI arguments and environment variables via clap.
//! The remote endpoint and its credential are resolved separately, from the
//! process environment, on every request.

use crate::error::{RestError, RestResult};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_RATE_LIMIT_MS: u64 = 100;

/// Environment variable holding the PostgREST base URL.
pub const URL_ENV: &str = "SUPABASE_URL";
/// Preferred credential variable.
pub const SERVICE_KEY_ENV: &str = "SUPABASE_SERVICE_KEY";
/// Fallback credential variable, used when the service key is absent or empty.
pub const ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Configuration for the PostgREST MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "postgrest-mcp-server",
    about = "MCP server for PostgREST APIs - enables AI assistants to query and modify Supabase tables",
    version,
    author
)]
pub struct Config {
    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Minimum interval between two outbound PostgREST requests, in milliseconds
    #[arg(
        long,
        default_value_t = DEFAULT_RATE_LIMIT_MS,
        env = "MCP_RATE_LIMIT_MS"
    )]
    pub rate_limit_ms: u64,

    /// Per-request timeout in seconds. No timeout when omitted.
    #[arg(long, value_name = "SECS", env = "MCP_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output below error level (logs always go to stderr)
    #[arg(long, env = "MCP_ENABLE_LOGS")]
    pub enable_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            request_timeout: None,
            log_level: "info".to_string(),
            json_logs: false,
            enable_logs: false,
        }
    }

    /// Get the rate limit interval as a Duration.
    pub fn rate_limit_duration(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    /// Get the request timeout as a Duration, if one is configured.
    pub fn request_timeout_duration(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }

    /// Effective log directive: `log_level` when logs are enabled, otherwise errors only.
    pub fn log_directive(&self) -> &str {
        if self.enable_logs {
            &self.log_level
        } else {
            "error"
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Resolved remote endpoint and credential.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Parsed PostgREST base URL (e.g. `https://project.supabase.co`)
    pub base_url: Url,
    /// API key sent as `apikey` and as bearer token (sensitive - not logged)
    pub credential: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url.as_str())
            .field("credential", &"***")
            .finish()
    }
}

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Resolves [`RemoteConfig`] from named variables.
///
/// Resolution is not cached: every call reads the variables again, so a missing
/// value surfaces on each request rather than once at startup.
#[derive(Clone)]
pub struct ConfigResolver {
    lookup: Arc<Lookup>,
}

impl ConfigResolver {
    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Resolver that always yields the given URL and credential.
    pub fn fixed(base_url: impl Into<String>, credential: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let credential = credential.into();
        Self::from_lookup(move |name| match name {
            URL_ENV => Some(base_url.clone()),
            SERVICE_KEY_ENV => Some(credential.clone()),
            _ => None,
        })
    }

    /// Read a variable, treating empty values as absent.
    fn var(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    /// Resolve the remote configuration, failing if either value is missing.
    pub fn resolve(&self) -> RestResult<RemoteConfig> {
        let url = self.var(URL_ENV);
        let credential = self
            .var(SERVICE_KEY_ENV)
            .or_else(|| self.var(ANON_KEY_ENV));

        let (Some(url), Some(credential)) = (url, credential) else {
            return Err(RestError::configuration(format!(
                "{URL_ENV} and {SERVICE_KEY_ENV} (or {ANON_KEY_ENV}) required"
            )));
        };

        let base_url = Url::parse(url.trim())
            .map_err(|e| RestError::configuration(format!("{URL_ENV} is not a valid URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RestError::configuration(format!(
                "{URL_ENV} must be an absolute http(s) URL"
            )));
        }

        Ok(RemoteConfig {
            base_url,
            credential,
        })
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver").finish_non_exhaustive()
    }
}
