//! Request executor for the API under test

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};

use crate::common::config::ApiConfig;
use crate::common::{Error, Result};

use super::types::{ApiResponse, FailureKind, Method, Outcome, Request, RequestBody, ResponseBody};

/// Sends requests to the configured API and normalizes what comes back
///
/// The executor never retries. Transport faults become `Outcome::Failed`
/// so a flaky network shows up in the report instead of aborting the run.
pub struct Executor {
    client: reqwest::Client,
    base_url: String,
    api_base: String,
    timeout: Duration,
}

impl Executor {
    /// Build an executor for the given API settings
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate()?;
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_base: config.api_base(),
            timeout,
        })
    }

    /// Service root as configured, without the API prefix
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API root every endpoint is appended to
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL for an endpoint
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base, endpoint)
    }

    /// Parse `method` and send a request with an optional JSON body
    ///
    /// Fails only when the method is not one the executor supports.
    pub async fn call(
        &self,
        method: &str,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Outcome> {
        let method: Method = method.parse()?;
        let mut request = Request::new(method, endpoint);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(self.execute(&request).await)
    }

    /// Send one request and return its outcome
    pub async fn execute(&self, request: &Request) -> Outcome {
        let url = self.url(&request.endpoint);
        tracing::debug!(method = %request.method, url = %url, "sending request");

        let headers = match build_headers(request) {
            Ok(headers) => headers,
            Err(message) => {
                tracing::warn!(url = %url, "Request failed: {}", message);
                return Outcome::failed(FailureKind::Request, message);
            }
        };

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .headers(headers);

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Raw(text)) => builder.body(text.clone()),
            None => builder,
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let kind = classify(&e);
                tracing::warn!(url = %url, kind = %kind, "Request failed: {}", e);
                return Outcome::failed(kind, e.to_string());
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(text) => {
                tracing::debug!(url = %url, status, "received response");
                Outcome::Response(ApiResponse {
                    status,
                    body: ResponseBody::from_text(text),
                })
            }
            Err(e) => {
                let kind = if e.is_timeout() {
                    FailureKind::Timeout
                } else {
                    FailureKind::Body
                };
                tracing::warn!(url = %url, status, "Failed to read response body: {}", e);
                Outcome::failed(kind, e.to_string())
            }
        }
    }
}

/// Default `Content-Type: application/json`, overridden by caller headers
fn build_headers(request: &Request) -> std::result::Result<HeaderMap, String> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(cookies) = request.cookie_header() {
        let value = HeaderValue::from_str(&cookies)
            .map_err(|e| format!("invalid cookie value '{}': {}", cookies, e))?;
        headers.insert(COOKIE, value);
    }

    for (name, value) in &request.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| format!("invalid header name '{}': {}", name, e))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| format!("invalid value for header '{}': {}", name, e))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

fn classify(error: &reqwest::Error) -> FailureKind {
    if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        FailureKind::Connect
    } else {
        FailureKind::Request
    }
}
