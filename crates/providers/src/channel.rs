use crate::types::{Answer, QueryRequest};
use crate::{HttpChannel, MockChannel};

use cdpchat_core::{ChannelConfig, ChannelError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Request/response link to the answering engine.
///
/// One call is one request; implementations never retry. Any failure, including
/// a timeout, comes back as a [`ChannelError`].
#[async_trait::async_trait]
pub trait Channel: Send + Sync {
    async fn query(&self, request: QueryRequest) -> std::result::Result<Answer, ChannelError>;

    /// Human-readable target, for status output and logs
    fn describe(&self) -> String;
}

pub struct ChannelFactory;

impl ChannelFactory {
    /// Concrete HTTP channel with its health route attached
    pub fn http_from_config(config: &ChannelConfig) -> Result<HttpChannel> {
        match config {
            ChannelConfig::Http { endpoint, timeout_ms, .. } => {
                let channel = HttpChannel::new(endpoint.clone(), Duration::from_millis(*timeout_ms))?;
                Ok(match config.health_endpoint() {
                    Some(url) => channel.with_health_endpoint(url),
                    None => channel,
                })
            }
            ChannelConfig::Mock { .. } => {
                Err(cdpchat_core::Error::Config("mock channel has no HTTP endpoint".to_string()))
            }
        }
    }

    pub fn create_from_config(config: &ChannelConfig) -> Result<Arc<dyn Channel>> {
        match config {
            ChannelConfig::Http { .. } => Ok(Arc::new(Self::http_from_config(config)?)),
            ChannelConfig::Mock { responses_file, latency_ms } => {
                let channel = match responses_file {
                    Some(path) => MockChannel::from_file(path)?,
                    None => MockChannel::default(),
                };
                Ok(Arc::new(channel.with_latency(Duration::from_millis(*latency_ms))))
            }
        }
    }
}
