//! Terminal chat screen: transcript, composer, and citation toggles.

pub mod app;
pub mod components;
pub mod event_handler;
pub mod layout;
pub mod state;
pub mod theme;
pub mod transcript;

pub use app::App;
pub use event_handler::{EventHandler, KeyAction};
pub use state::{AppState, CitationToggles, InputState};
pub use theme::{Theme, ThemePalette};
pub use transcript::{EntryView, render_entry};
