//! Request model for PostgREST calls.

use reqwest::Method;
use serde_json::Value as JsonValue;
use url::Url;
use url::form_urlencoded;

/// PostgREST API prefix appended to the base URL.
const REST_PREFIX: [&str; 2] = ["rest", "v1"];

/// Target resource of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/rest/v1/{table}`
    Table(String),
    /// `/rest/v1/rpc/{function}`
    Rpc(String),
    /// `/rest/v1/rpc/`
    RpcRoot,
}

impl Route {
    fn segments(&self) -> Vec<&str> {
        let mut segments = REST_PREFIX.to_vec();
        match self {
            Route::Table(table) => segments.push(table),
            Route::Rpc(function) => segments.extend(["rpc", function.as_str()]),
            Route::RpcRoot => segments.extend(["rpc", ""]),
        }
        segments
    }

    /// Append this route to `base`, keeping any path prefix the base already has.
    pub fn join(&self, base: &Url) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(self.segments());
        }
        url
    }
}

/// Values of the `Prefer` request header understood by PostgREST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefer {
    /// Ask for the total row count in `Content-Range`
    CountExact,
    /// Ask writes to return the affected rows
    ReturnRepresentation,
}

impl Prefer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefer::CountExact => "count=exact",
            Prefer::ReturnRepresentation => "return=representation",
        }
    }
}

/// Ordered query parameters with URL search-params `set` semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key keeps its position and loses any
    /// later duplicates; a new key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| *k == key) {
            Some(idx) => {
                self.pairs[idx].1 = value;
                let mut seen = 0;
                self.pairs.retain(|(k, _)| {
                    if *k == key {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// One outbound PostgREST request.
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub method: Method,
    pub route: Route,
    pub query: QueryParams,
    /// `None` sends no body; `Some` is always serialized, even `{}` or `[]`.
    pub body: Option<JsonValue>,
    /// Extra headers, applied after the defaults so they win on collision.
    pub headers: Vec<(String, String)>,
}

impl RestRequest {
    pub fn new(method: Method, route: Route) -> Self {
        Self {
            method,
            route,
            query: QueryParams::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(route: Route) -> Self {
        Self::new(Method::GET, route)
    }

    pub fn post(route: Route) -> Self {
        Self::new(Method::POST, route)
    }

    pub fn patch(route: Route) -> Self {
        Self::new(Method::PATCH, route)
    }

    pub fn delete(route: Route) -> Self {
        Self::new(Method::DELETE, route)
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn prefer(self, prefer: Prefer) -> Self {
        self.with_header("Prefer", prefer.as_str())
    }

    /// Full request URL against `base`.
    pub fn url(&self, base: &Url) -> Url {
        let mut url = self.route.join(base);
        if self.query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&self.query.encode()));
        }
        url
    }

    /// Path and query as they appear on the wire, used for logging.
    pub fn path_and_query(&self) -> String {
        let path = format!("/{}", self.route.segments().join("/"));
        if self.query.is_empty() {
            path
        } else {
            format!("{}?{}", path, self.query.encode())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://abc.supabase.co").unwrap()
    }

    #[test]
    fn test_table_route() {
        let url = Route::Table("users".into()).join(&base());
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/users");
    }

    #[test]
    fn test_rpc_route() {
        let url = Route::Rpc("get_stats".into()).join(&base());
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/rpc/get_stats");
    }

    #[test]
    fn test_rpc_root_keeps_trailing_slash() {
        let url = Route::RpcRoot.join(&base());
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/rpc/");
    }

    #[test]
    fn test_route_with_trailing_slash_base() {
        let base = Url::parse("http://localhost:54321/").unwrap();
        let url = Route::Table("users".into()).join(&base);
        assert_eq!(url.as_str(), "http://localhost:54321/rest/v1/users");
    }

    #[test]
    fn test_route_keeps_base_path_prefix() {
        let base = Url::parse("http://gateway.local/supabase/").unwrap();
        let url = Route::Table("users".into()).join(&base);
        assert_eq!(url.as_str(), "http://gateway.local/supabase/rest/v1/users");
    }

    #[test]
    fn test_route_encodes_table_name() {
        let url = Route::Table("my table".into()).join(&base());
        assert_eq!(url.path(), "/rest/v1/my%20table");
    }

    #[test]
    fn test_query_params_preserve_insertion_order() {
        let mut params = QueryParams::new();
        params.set("select", "*");
        params.set("limit", "10");
        params.set("id", "eq.5");
        assert_eq!(params.encode(), "select=*&limit=10&id=eq.5");
    }

    #[test]
    fn test_query_params_set_overwrites_in_place() {
        let mut params = QueryParams::new();
        params.set("select", "*");
        params.set("limit", "20");
        params.set("select", "id,name");
        assert_eq!(params.encode(), "select=id%2Cname&limit=20");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_query_params_get() {
        let mut params = QueryParams::new();
        params.set("order", "created_at.desc");
        assert_eq!(params.get("order"), Some("created_at.desc"));
        assert_eq!(params.get("limit"), None);
    }

    #[test]
    fn test_request_url_with_query() {
        let mut query = QueryParams::new();
        query.set("select", "*");
        query.set("limit", "10");
        let request = RestRequest::get(Route::Table("users".into())).with_query(query);
        assert_eq!(
            request.url(&base()).as_str(),
            "https://abc.supabase.co/rest/v1/users?select=*&limit=10"
        );
        assert_eq!(request.path_and_query(), "/rest/v1/users?select=*&limit=10");
    }

    #[test]
    fn test_request_url_without_query() {
        let request = RestRequest::post(Route::Table("users".into()));
        assert_eq!(
            request.url(&base()).as_str(),
            "https://abc.supabase.co/rest/v1/users"
        );
    }

    #[test]
    fn test_request_body_presence_is_explicit() {
        let request = RestRequest::post(Route::Rpc("noop".into())).with_body(json!({}));
        assert_eq!(request.body, Some(json!({})));
        assert!(RestRequest::get(Route::RpcRoot).body.is_none());
    }

    #[test]
    fn test_prefer_header() {
        let request = RestRequest::get(Route::Table("t".into())).prefer(Prefer::CountExact);
        assert_eq!(
            request.headers,
            vec![("Prefer".to_string(), "count=exact".to_string())]
        );
        assert_eq!(Prefer::ReturnRepresentation.as_str(), "return=representation");
    }
}
