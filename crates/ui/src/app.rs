use crate::event_handler::KeyAction;
use crate::state::AppState;

use cdpchat_agent::{Conversation, DispatchEvent};
use cdpchat_core::{ChatConfig, EntryStatus, Result, TranscriptChange};
use ratatui::Frame;
use tokio::sync::watch;

mod event_loop;
mod rendering;

/// Main TUI application
///
/// Owns the conversation (and through it the transcript) plus the view state
/// around it. Keys become [`KeyAction`]s, request completions arrive through
/// the conversation, and every change to the transcript triggers a redraw.
pub struct App {
    pub(crate) state: AppState,
    pub(crate) conversation: Conversation,
    pub(crate) changes: watch::Receiver<TranscriptChange>,
    pub(crate) should_exit: bool,
}

impl App {
    pub fn new(conversation: Conversation, chat: &ChatConfig) -> Self {
        let mut state = AppState::new(chat, conversation.describe_channel());
        state.input.message_history = conversation.transcript().user_messages();
        let changes = conversation.subscribe();
        Self { state, conversation, changes, should_exit: false }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn handle_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Submit => {
                if self.state.input.try_submit(&mut self.conversation) {
                    self.state.ui.scroll_to_bottom();
                }
            }
            KeyAction::ToggleCitations => {
                if let Some((id, visible)) = self.state.citations.toggle_focused(self.conversation.entries()) {
                    tracing::debug!(entry = %id, visible, "citations toggled");
                }
            }
            KeyAction::FocusNext => {
                self.state.citations.focus_next(self.conversation.entries());
            }
            KeyAction::FocusPrev => {
                self.state.citations.focus_prev(self.conversation.entries());
            }
            KeyAction::ClearFocus => self.state.citations.clear_focus(),
            KeyAction::PageUp => self.state.ui.page_up(),
            KeyAction::PageDown => self.state.ui.page_down(),
            KeyAction::ScrollToBottom => self.state.ui.scroll_to_bottom(),
            KeyAction::Exit => self.should_exit = true,
        }
        self.sync_in_flight();
    }

    /// Settle the pending entry a completed request belongs to
    pub fn handle_dispatch(&mut self, event: DispatchEvent) -> Result<EntryStatus> {
        let status = self.conversation.apply(event);
        self.sync_in_flight();
        status
    }

    /// Wait for the next request completion. Cancel safe.
    pub async fn next_dispatch(&mut self) -> Option<DispatchEvent> {
        self.conversation.next_event().await
    }

    /// Every transcript change pulls the view back to the newest entry
    pub fn on_transcript_change(&mut self, change: TranscriptChange) {
        tracing::trace!(revision = change.revision, kind = ?change.kind, "transcript changed");
        self.state.ui.scroll_to_bottom();
    }

    pub fn render(&mut self, frame: &mut Frame<'_>) {
        rendering::draw(self, frame);
    }

    /// Run until the user exits, restoring the terminal on the way out
    pub async fn run(&mut self) -> Result<()> {
        event_loop::run(self).await
    }

    fn sync_in_flight(&mut self) {
        self.state.in_flight = self.conversation.is_in_flight();
    }
}
