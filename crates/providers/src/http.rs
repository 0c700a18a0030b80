use crate::Channel;
use crate::types::{Answer, QueryRequest, parse_response_body};

use cdpchat_core::{ChannelError, Error, Result};
use reqwest::Client as HttpClient;
use std::time::Duration;

/// Longest error body kept in a [`ChannelError::Status`]
const MAX_ERROR_BODY: usize = 200;

/// JSON-over-HTTP channel: `POST {endpoint}` with `{ "query": ... }`
pub struct HttpChannel {
    pub(crate) client: HttpClient,
    endpoint: String,
    timeout: Duration,
    pub(crate) health_endpoint: Option<String>,
}

impl HttpChannel {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint: endpoint.into(), timeout, health_endpoint: None })
    }

    pub fn with_health_endpoint(mut self, url: impl Into<String>) -> Self {
        self.health_endpoint = Some(url.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn health_endpoint(&self) -> Option<&str> {
        self.health_endpoint.as_deref()
    }

    fn map_send_error(&self, err: reqwest::Error) -> ChannelError {
        if err.is_timeout() {
            ChannelError::Timeout(self.timeout.as_millis() as u64)
        } else {
            ChannelError::transport(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl Channel for HttpChannel {
    async fn query(&self, request: QueryRequest) -> std::result::Result<Answer, ChannelError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            tracing::debug!(status = status.as_u16(), "answering engine rejected query");
            return Err(ChannelError::Status { code: status.as_u16(), body });
        }

        let answer = parse_response_body(&body)?;
        tracing::debug!(
            citations = answer.citations.len(),
            query_type = answer.query_type.as_deref().unwrap_or("-"),
            "answer received"
        );
        Ok(answer)
    }

    fn describe(&self) -> String {
        format!("http POST {}", self.endpoint)
    }
}
