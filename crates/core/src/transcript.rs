//! Conversation transcript: the single source of truth for what is rendered.
//!
//! The transcript is append-only. The one in-place mutation allowed is the
//! lifecycle transition of a pending bot placeholder to `resolved` or `failed`,
//! which keeps the entry's id and position.

mod entry;
mod store;

pub use entry::{Citation, EntryId, EntryStatus, NewEntry, Resolution, Role, TranscriptEntry};
pub use store::{ChangeKind, TranscriptChange, TranscriptStore};
