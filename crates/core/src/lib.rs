pub mod config;
pub mod error;
pub mod logging;
pub mod transcript;

pub use config::{ChannelConfig, ChatConfig, Config, ConfigError};
pub use error::{ChannelError, Error, Result, TranscriptError, TransitionFault};
pub use transcript::{
    ChangeKind, Citation, EntryId, EntryStatus, NewEntry, Resolution, Role, TranscriptChange, TranscriptEntry,
    TranscriptStore,
};
