//! Extraction context providing access to request data.
//!
//! The [`ExtractionContext`] is the request type `C` every built-in source
//! reads from. Besides the request parts it carries typed values placed there
//! by earlier layers (authentication, tenancy, ...) and a sink for response
//! headers a source may want to emit.

use crate::error::{ExtractionError, ExtractionSource};
use crate::params::Params;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};
use parking_lot::Mutex;
use recordbind_core::Opaque;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Context providing access to all parts of an HTTP request.
///
/// # Example
///
/// ```rust
/// use recordbind_extract::{ExtractionContext, Params};
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut params = Params::new();
/// params.push("id", "123");
///
/// let ctx = ExtractionContext::new(
///     Method::GET,
///     Uri::from_static("/users/123?active=true"),
///     HeaderMap::new(),
///     Bytes::new(),
///     params,
/// );
///
/// assert_eq!(ctx.method(), &Method::GET);
/// assert_eq!(ctx.path_params().get("id"), Some("123"));
/// assert_eq!(ctx.query_values("active").unwrap(), vec!["true"]);
/// ```
#[derive(Debug)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    values: HashMap<String, Opaque>,
    query: OnceLock<Vec<(String, String)>>,
    response_headers: Mutex<HeaderMap>,
}

impl ExtractionContext {
    /// Creates a new extraction context.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        path_params: Params,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
            values: HashMap::new(),
            query: OnceLock::new(),
            response_headers: Mutex::new(HeaderMap::new()),
        }
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> ExtractionContextBuilder {
        ExtractionContextBuilder::new()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the decoded query pairs in order. Parsed once per context.
    ///
    /// # Errors
    ///
    /// Returns an error if the query string is not form-urlencoded.
    pub fn query_pairs(&self) -> Result<&[(String, String)], ExtractionError> {
        if let Some(pairs) = self.query.get() {
            return Ok(pairs);
        }
        let parsed: Vec<(String, String)> =
            serde_urlencoded::from_str(self.query_string().unwrap_or(""))
                .map_err(|e| ExtractionError::malformed(ExtractionSource::Query, e.to_string()))?;
        Ok(self.query.get_or_init(|| parsed))
    }

    /// Returns every query value for `key`, in order of appearance.
    ///
    /// # Errors
    ///
    /// Returns an error if the query string is not form-urlencoded.
    pub fn query_values(&self, key: &str) -> Result<Vec<&str>, ExtractionError> {
        Ok(self
            .query_pairs()?
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect())
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Checks if the request body is empty.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the captured path parameters.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns a mutable reference to path parameters.
    pub fn path_params_mut(&mut self) -> &mut Params {
        &mut self.path_params
    }

    /// Stores a request-scoped value under `key`, replacing any previous one.
    pub fn insert_value(&mut self, key: impl Into<String>, value: Opaque) {
        self.values.insert(key.into(), value);
    }

    /// Returns the request-scoped value stored under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Opaque> {
        self.values.get(key)
    }

    /// Queues a header for the response.
    pub fn set_response_header(&self, name: HeaderName, value: HeaderValue) {
        self.response_headers.lock().insert(name, value);
    }

    /// Takes the queued response headers, leaving none behind.
    #[must_use]
    pub fn take_response_headers(&self) -> HeaderMap {
        std::mem::take(&mut *self.response_headers.lock())
    }
}

impl Clone for ExtractionContext {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            uri: self.uri.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            path_params: self.path_params.clone(),
            values: self.values.clone(),
            query: self.query.clone(),
            response_headers: Mutex::new(self.response_headers.lock().clone()),
        }
    }
}

/// Builder for constructing an `ExtractionContext`.
///
/// Method defaults to `GET` and the URI to `/`.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    values: HashMap<String, Opaque>,
}

impl ExtractionContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = uri;
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends a header value; invalid names or values are skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the path parameters.
    #[must_use]
    pub fn path_params(mut self, params: Params) -> Self {
        self.path_params = params;
        self
    }

    /// Adds a single path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Adds a request-scoped value.
    #[must_use]
    pub fn value(mut self, key: impl Into<String>, value: Opaque) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Builds the extraction context.
    #[must_use]
    pub fn build(self) -> ExtractionContext {
        let mut ctx = ExtractionContext::new(
            self.method,
            self.uri,
            self.headers,
            self.body,
            self.path_params,
        );
        ctx.values = self.values;
        ctx
    }
}
