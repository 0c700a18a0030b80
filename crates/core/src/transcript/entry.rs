use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a transcript entry.
///
/// Assigned by the store in append order, so ids compare the same way entries
/// were submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Author of an entry, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

/// Lifecycle of a bot entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Waiting on the answering engine
    Pending,
    /// Answer merged in
    Resolved,
    /// Request failed; text is the fixed error message
    Failed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Resolved => "resolved",
            EntryStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, EntryStatus::Pending)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A source reference attached to a resolved bot entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub url: String,
    /// Which documentation set the source came from (e.g. "Segment")
    pub source_label: String,
}

impl Citation {
    pub fn new(title: impl Into<String>, url: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self { title: title.into(), url: url.into(), source_label: source_label.into() }
    }
}

/// One transcript item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub role: Role,
    pub text: String,
    /// Only populated on resolved bot entries
    pub citations: Vec<Citation>,
    /// `None` for user entries
    pub status: Option<EntryStatus>,
    /// Classifier label returned alongside an answer
    pub query_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_bot(&self) -> bool {
        self.role == Role::Bot
    }

    pub fn is_pending(&self) -> bool {
        self.status == Some(EntryStatus::Pending)
    }

    pub fn is_failed(&self) -> bool {
        self.status == Some(EntryStatus::Failed)
    }

    /// Whether a citation toggle should be offered for this entry
    pub fn has_citations(&self) -> bool {
        self.status == Some(EntryStatus::Resolved) && !self.citations.is_empty()
    }
}

/// Input to [`TranscriptStore::append`](super::TranscriptStore::append).
///
/// The store assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub role: Role,
    pub text: String,
    pub citations: Vec<Citation>,
    pub status: Option<EntryStatus>,
    pub query_type: Option<String>,
}

impl NewEntry {
    /// User entry; text is kept exactly as typed
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into(), citations: Vec::new(), status: None, query_type: None }
    }

    /// Bot placeholder awaiting a response
    pub fn pending_bot() -> Self {
        Self {
            role: Role::Bot,
            text: String::new(),
            citations: Vec::new(),
            status: Some(EntryStatus::Pending),
            query_type: None,
        }
    }

    /// Already-resolved bot entry without citations (the welcome greeting)
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            citations: Vec::new(),
            status: Some(EntryStatus::Resolved),
            query_type: None,
        }
    }
}

/// Outcome merged into a pending entry
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved { text: String, citations: Vec<Citation>, query_type: Option<String> },
    Failed { text: String },
}

impl Resolution {
    pub fn status(&self) -> EntryStatus {
        match self {
            Resolution::Resolved { .. } => EntryStatus::Resolved,
            Resolution::Failed { .. } => EntryStatus::Failed,
        }
    }
}
