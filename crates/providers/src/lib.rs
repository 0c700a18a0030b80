//! Channels to the documentation answering engine.
//!
//! A [`Channel`] turns one question into one [`Answer`] or one [`ChannelError`].
//! [`HttpChannel`] talks to the real engine; [`MockChannel`] replays scripted
//! replies for offline runs and tests.

pub mod channel;
pub mod health;
pub mod http;
pub mod mock;
pub mod types;

pub use channel::{Channel, ChannelFactory};
pub use health::{HealthCheck, HealthCheckResult};
pub use http::HttpChannel;
pub use mock::{MockChannel, MockResponse};
pub use types::{Answer, ContextSource, QueryRequest, QueryResponse, parse_response_body};

pub use cdpchat_core::{ChannelError, Error, Result};
