//! HTTP Connection Management
//!
//! This module wraps the reqwest client used for every request of an upload
//! session. A single client is built per [`Client`](crate::Client) so the
//! underlying connection pool is reused across probes and uploads.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::RequestBuilder;
use tracing::debug;

use crate::errors::{Result, UploadError};
use crate::types::ClientConfig;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

/// HTTP connection to the upload endpoint
pub struct Connection {
    client: reqwest::Client,
}

impl Connection {
    /// Builds a connection from the client configuration
    ///
    /// Timeouts left as None are not applied, so a stalled server stalls
    /// the session.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());

        if let Some(ms) = config.connect_timeout {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = config.request_timeout {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        let client = builder.build().map_err(UploadError::ClientInit)?;
        Ok(Self { client })
    }

    /// Sends a GET request with the given Authorization header
    pub async fn get(&self, url: &str, authorization: &str) -> Result<HttpResponse> {
        let request = self.client.get(url).header(AUTHORIZATION, authorization);
        self.execute("probe", url, request).await
    }

    /// Sends a POST request with the given body and content type
    pub async fn post(
        &self,
        url: &str,
        authorization: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<HttpResponse> {
        let request = self
            .client
            .post(url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, content_type)
            .body(body);
        self.execute("upload", url, request).await
    }

    /// Sends a request and reads the whole response body
    async fn execute(
        &self,
        operation: &str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<HttpResponse> {
        let transport_error = |source: reqwest::Error| UploadError::Transport {
            operation: operation.to_string(),
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        debug!(operation, url, status, body_len = body.len(), "request completed");

        Ok(HttpResponse { status, body })
    }
}
