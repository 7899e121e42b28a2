//! HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use std::time::Duration;

use pubnub_core::{Config, HttpMethod};

use crate::error::{Result, TransportError};
use crate::transport::{Transport, TransportRequest, TransportResponse};

/// Sends requests over HTTPS with a shared connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport using the config's connect timeout.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_connect_timeout(config.connect_timeout())
    }

    /// Build a transport with an explicit connect timeout.
    pub fn with_connect_timeout(connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self
                .client
                .post(&request.url)
                .header("Content-Type", "application/json")
                .body(request.body),
        };

        let response = builder
            .timeout(request.timeout)
            .send()
            .await
            .map_err(map_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_error)?;

        tracing::trace!(status, len = body.len(), "response received");

        Ok(TransportResponse { status, body })
    }
}

fn map_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else if error.is_builder() {
        TransportError::InvalidRequest(error.to_string())
    } else {
        TransportError::Connection(error.to_string())
    }
}
