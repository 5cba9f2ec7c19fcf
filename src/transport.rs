//! HTTP transport.
//!
//! Queries talk to the network through [`Transport`], built once per query by
//! a [`Connector`]. [`ReqwestConnector`] is the production implementation.

use crate::error::{AdsError, Result};
use crate::rate_limit::RateLimits;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;

/// Raw HTTP response: status, body text, and headers.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub headers: HeaderMap,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn ratelimits(&self) -> RateLimits {
        RateLimits::from_headers(&self.headers)
    }
}

/// A connected HTTP client carrying session headers.
pub trait Transport: Send {
    /// GET `url` with the given query parameters.
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<HttpResponse>;

    /// POST a JSON body to `url`.
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse>;
}

/// Builds a [`Transport`] with fixed default headers.
pub trait Connector: Send + Sync {
    fn connect(&self, headers: HeaderMap) -> Result<Box<dyn Transport>>;
}

/// Session headers: bearer token (when known), client identifier, JSON content type.
pub fn session_headers(token: Option<&str>, user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| AdsError::Config(format!("invalid API token: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
    }
    let agent = HeaderValue::from_str(user_agent)
        .map_err(|e| AdsError::Config(format!("invalid user agent: {}", e)))?;
    headers.insert(USER_AGENT, agent);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Connector backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestConnector {
    timeout: Duration,
}

impl ReqwestConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ReqwestConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl Connector for ReqwestConnector {
    fn connect(&self, headers: HeaderMap) -> Result<Box<dyn Transport>> {
        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()?;
        Ok(Box::new(ReqwestTransport { http }))
    }
}

struct ReqwestTransport {
    http: reqwest::blocking::Client,
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<HttpResponse> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).query(params).send()?;
        into_http_response(response)
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        tracing::debug!(%url, "POST");
        let response = self.http.post(url).json(body).send()?;
        into_http_response(response)
    }
}

fn into_http_response(response: reqwest::blocking::Response) -> Result<HttpResponse> {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.text()?;
    Ok(HttpResponse {
        status,
        body,
        headers,
    })
}
