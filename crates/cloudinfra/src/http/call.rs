//! Call specification.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// Specification of one logical gateway call.
///
/// Constructed per call and discarded after. The method shortcuts on
/// [`Session`](crate::Session) build these internally; use the builder
/// directly for projections, query parameters or extra headers:
///
/// ```
/// use cloudinfra::CallSpec;
///
/// let spec = CallSpec::get("user").query("users[0].email");
/// assert_eq!(spec.projection(), Some("users[0].email"));
/// ```
#[derive(Debug, Clone)]
pub struct CallSpec {
    method: Method,
    endpoint: String,
    body: Option<Value>,
    query: Option<String>,
    params: Vec<(String, String)>,
    headers: HeaderMap,
}

impl CallSpec {
    /// A call with an arbitrary method.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: None,
            params: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    /// A GET call.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// A POST call.
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// A PUT call.
    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    /// A DELETE call.
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// A PATCH call.
    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    /// Attach a JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a projection expression applied to a decoded JSON response.
    pub fn query(mut self, expression: impl Into<String>) -> Self {
        self.query = Some(expression.into());
        self
    }

    /// Append a query-string parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Append a request header. `Authorization` is always overwritten by the
    /// session token at send time.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn body_value(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn projection(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
