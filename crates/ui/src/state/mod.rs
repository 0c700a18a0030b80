use cdpchat_core::ChatConfig;

mod citations;
mod input;
mod ui;

pub use citations::CitationToggles;
pub use input::InputState;
pub use ui::UIState;

/// Static header text
#[derive(Debug, Clone)]
pub struct HeaderState {
    pub title: String,
    pub subtitle: String,
    /// Where questions go, e.g. "http POST http://localhost:8000/api/query"
    pub channel: String,
}

/// Everything the chat screen shows besides the transcript itself
#[derive(Debug, Clone)]
pub struct AppState {
    pub header: HeaderState,
    pub placeholder: String,
    pub input: InputState,
    pub citations: CitationToggles,
    pub ui: UIState,
    /// Mirrors the dispatcher's gate for the footer and key handling
    pub in_flight: bool,
}

impl AppState {
    pub fn new(chat: &ChatConfig, channel: impl Into<String>) -> Self {
        Self {
            header: HeaderState { title: chat.title.clone(), subtitle: chat.subtitle.clone(), channel: channel.into() },
            placeholder: chat.placeholder.clone(),
            input: InputState::new(),
            citations: CitationToggles::new(),
            ui: UIState::new(),
            in_flight: false,
        }
    }

    pub fn is_submittable(&self) -> bool {
        self.input.is_submittable(self.in_flight)
    }

    /// Loading indicator for the pending entry
    pub fn loading_dots(&self) -> &'static str {
        crate::transcript::loading_dots(self.ui.animation_frame)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&ChatConfig::default(), "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_from_chat_config() {
        let chat = ChatConfig::default();
        let state = AppState::new(&chat, "mock (1 built-in responses)");
        assert_eq!(state.header.title, chat.title);
        assert_eq!(state.placeholder, chat.placeholder);
        assert!(!state.in_flight);
    }

    #[test]
    fn test_submittable_follows_gate() {
        let mut state = AppState::default();
        state.input.set_draft("hello");
        assert!(state.is_submittable());

        state.in_flight = true;
        assert!(!state.is_submittable());
    }

    #[test]
    fn test_loading_dots_animate() {
        let mut state = AppState::default();
        let first = state.loading_dots();
        state.ui.advance_animation_frame();
        assert_ne!(first, state.loading_dots());
    }
}
