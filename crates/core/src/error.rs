use crate::transcript::{EntryId, EntryStatus};

use thiserror::Error;

/// Result type alias for cdpchat-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the chat client
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Request/response channel errors
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Transcript invariant violations
    #[error("transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Logging setup errors
    #[error("logging error: {0}")]
    Logging(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Failure of a single request to the answering engine.
///
/// Every variant is surfaced to the user the same way (one failed bot entry with
/// fixed text); the variants only exist so the detail can be logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The request could not be sent or the connection dropped
    #[error("transport failure: {0}")]
    Transport(String),

    /// No response arrived within the channel's timeout
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The answering engine replied with a non-success status
    #[error("answering engine returned status {code}: {body}")]
    Status { code: u16, body: String },

    /// The body could not be decoded
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// The body decoded but carried no answer
    #[error("response did not contain an answer")]
    MissingAnswer,
}

impl ChannelError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedBody(message.into())
    }

    /// Short machine-friendly label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "status",
            Self::MalformedBody(_) => "malformed_body",
            Self::MissingAnswer => "missing_answer",
        }
    }
}

/// Why a pending transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionFault {
    /// No entry carries the id
    UnknownEntry,
    /// The id belongs to a user entry, which has no lifecycle
    UserEntry,
    /// The entry exists but has already left `pending`
    NotPending(EntryStatus),
    /// A resolution arrived for a request that is not the one in flight
    StaleRequest,
}

impl std::fmt::Display for TransitionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionFault::UnknownEntry => write!(f, "no such entry"),
            TransitionFault::UserEntry => write!(f, "user entries have no lifecycle"),
            TransitionFault::NotPending(status) => write!(f, "entry is already {}", status),
            TransitionFault::StaleRequest => write!(f, "resolution does not match the in-flight request"),
        }
    }
}

/// Transcript invariant violations.
///
/// These are programming errors, never user-recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("invalid state transition for entry {id}: {fault}")]
    InvalidStateTransition { id: EntryId, fault: TransitionFault },
}

impl TranscriptError {
    pub fn invalid(id: EntryId, fault: TransitionFault) -> Self {
        Self::InvalidStateTransition { id, fault }
    }

    pub fn fault(&self) -> TransitionFault {
        match self {
            Self::InvalidStateTransition { fault, .. } => *fault,
        }
    }
}
