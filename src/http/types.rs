//! Request and outcome types
//!
//! A `Request` describes one call. An `Outcome` is what came back: either an
//! HTTP response with any status, or a transport failure. Neither variant
//! is an error in the `Result` sense.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::common::{Error, Result};

/// HTTP methods the executor will send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PATCH" => Ok(Method::Patch),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::unsupported_method(s)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Payload attached to a request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON
    Json(Value),
    /// Sent verbatim; used to submit malformed JSON on purpose
    Raw(String),
}

/// One HTTP call against the API, relative to the API base
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path appended to the API base, e.g. `/businesses?search=Acme`
    pub endpoint: String,
    pub body: Option<RequestBody>,
    /// Cookies in insertion order
    pub cookies: Vec<(String, String)>,
    /// Headers merged over the defaults; later entries win
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            cookies: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Raw(body.into()));
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Cookies rendered as a single `Cookie` header value
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Body of a received response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// Anything that did not parse as JSON, including an empty body
    Text(String),
}

impl ResponseBody {
    /// Parse as JSON when possible, otherwise keep the text
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{}", value),
            ResponseBody::Text(text) => f.write_str(text),
        }
    }
}

/// A response that made it back over the wire
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// Top-level field of a JSON object body
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.json().and_then(|v| v.get(name))
    }

    /// Body as a JSON array
    pub fn items(&self) -> Option<&Vec<Value>> {
        self.json().and_then(Value::as_array)
    }

    /// Number of items in a JSON array body, zero otherwise
    pub fn count(&self) -> usize {
        self.items().map_or(0, Vec::len)
    }

    /// The API's `error` field, or a placeholder when absent
    pub fn error_message(&self) -> String {
        self.field("error")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string()
    }
}

/// Why a request never produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    /// The request could not be built or sent (bad URL, bad header, ...)
    Request,
    /// The response arrived but its body could not be read
    Body,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connect => "connect",
            FailureKind::Request => "request",
            FailureKind::Body => "body",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure: {}", self.kind, self.message)
    }
}

/// Result of a single HTTP call
#[derive(Debug, Clone)]
pub enum Outcome {
    Response(ApiResponse),
    Failed(TransportFailure),
}

impl Outcome {
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Outcome::Failed(TransportFailure {
            kind,
            message: message.into(),
        })
    }

    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Outcome::Response(resp) => Some(resp),
            Outcome::Failed(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    pub fn has_status(&self, expected: u16) -> bool {
        self.status() == Some(expected)
    }

    /// Status for report messages; `None` when nothing came back
    pub fn status_label(&self) -> String {
        match self.status() {
            Some(code) => code.to_string(),
            None => "None".to_string(),
        }
    }

    /// The API error message, or `No response` for transport failures
    pub fn error_label(&self) -> String {
        match self {
            Outcome::Response(resp) => resp.error_message(),
            Outcome::Failed(_) => "No response".to_string(),
        }
    }
}
