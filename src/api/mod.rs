//! Thin authenticated HTTP client for the Moltbook API.

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Response};
use serde_json::Value;

use crate::consts::API_TIMEOUT;

/// Authenticated client bound to one API base URL.
///
/// Owns the fixed headers and timeout; callers only pick method, endpoint
/// and body. Redirects are followed (reqwest's default policy).
pub struct Api {
    client: reqwest::Client,
    base_url: String,
}

impl Api {
    pub fn new(base_url: impl Into<String>, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("service token is not a valid header value")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(API_TIMEOUT)
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for an endpoint path, normalizing slashes.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Issue a request with an optional JSON body. Bodyless requests (e.g.
    /// DELETE) simply omit the payload.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> reqwest::Result<Response> {
        let mut req = self.client.request(method, self.url(endpoint));
        if let Some(body) = body {
            req = req.json(body);
        }
        req.send().await
    }

    /// Authenticated GET of an arbitrary API path.
    pub async fn get(&self, path: &str) -> reqwest::Result<Response> {
        self.client.get(self.url(path)).send().await
    }
}
