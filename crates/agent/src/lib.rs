//! Conversation state machine: submission gate, request dispatch, and
//! resolution of pending transcript entries.

pub mod conversation;
pub mod dispatcher;

pub use conversation::Conversation;
pub use dispatcher::{DispatchEvent, Dispatcher, DispatcherSettings, RequestId, SubmitOutcome, SubmitRejection};
