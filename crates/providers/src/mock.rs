use crate::Channel;
use crate::types::{Answer, QueryRequest};

use cdpchat_core::{ChannelError, Citation, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned reply for deterministic runs without an answering engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MockResponse {
    Answer {
        text: String,
        #[serde(default)]
        citations: Vec<Citation>,
        #[serde(default)]
        query_type: Option<String>,
    },
    /// Fails the request as a transport error
    Error { message: String },
    /// Succeeds at the transport level without an answer
    MissingAnswer,
}

impl MockResponse {
    fn into_result(self) -> std::result::Result<Answer, ChannelError> {
        match self {
            MockResponse::Answer { text, citations, query_type } => Ok(Answer { text, citations, query_type }),
            MockResponse::Error { message } => Err(ChannelError::transport(message)),
            MockResponse::MissingAnswer => Err(ChannelError::MissingAnswer),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MockScript {
    responses: Vec<MockResponse>,
}

/// Replays scripted responses in order, one per query
pub struct MockChannel {
    responses: Vec<MockResponse>,
    current: Arc<AtomicUsize>,
    latency: Duration,
    source: Option<PathBuf>,
}

impl MockChannel {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self { responses, current: Arc::new(AtomicUsize::new(0)), latency: Duration::ZERO, source: None }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let script: MockScript =
            toml::from_str(content).map_err(|e| Error::Config(format!("invalid mock responses: {}", e)))?;
        Ok(Self::new(script.responses))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read mock responses {}: {}", path.display(), e)))?;
        let mut channel = Self::from_toml_str(&content)?;
        channel.source = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), responses = channel.responses.len(), "loaded mock responses");
        Ok(channel)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of queries answered so far
    pub fn served(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> MockResponse {
        let index = self.current.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(index) {
            Some(response) => response.clone(),
            None => MockResponse::Answer {
                text: format!(
                    "No more mock responses configured (requested: {}, available: {})",
                    index + 1,
                    self.responses.len()
                ),
                citations: Vec::new(),
                query_type: None,
            },
        }
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new(vec![MockResponse::Answer {
            text: "Mock answer - set responses_file in the [channel] config to script replies".to_string(),
            citations: Vec::new(),
            query_type: None,
        }])
    }
}

#[async_trait::async_trait]
impl Channel for MockChannel {
    async fn query(&self, request: QueryRequest) -> std::result::Result<Answer, ChannelError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let response = self.next_response();
        tracing::trace!(query_chars = request.query.chars().count(), ?response, "mock reply");
        response.into_result()
    }

    fn describe(&self) -> String {
        match &self.source {
            Some(path) => format!("mock ({} responses from {})", self.responses.len(), path.display()),
            None => format!("mock ({} built-in responses)", self.responses.len()),
        }
    }
}
