use cdpchat_agent::{Conversation, SubmitOutcome};

/// Draft being composed plus sent-message history.
///
/// `cursor` counts chars, not bytes.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub buffer: String,
    pub cursor: usize,
    /// Messages sent so far, oldest first
    pub message_history: Vec<String>,
    /// Current position in history (None = editing a new message)
    pub history_index: Option<usize>,
    /// Draft stashed while browsing history
    pub temp_buffer: Option<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the draft and move the cursor to its end
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.char_len();
        self.reset_history_navigation();
    }

    pub fn current_draft(&self) -> &str {
        &self.buffer
    }

    /// Non-blank draft and nothing in flight
    pub fn is_submittable(&self, in_flight: bool) -> bool {
        !in_flight && !self.buffer.trim().is_empty()
    }

    /// Hand the draft to the conversation. On dispatch the draft is cleared and
    /// recorded in history; otherwise it is left as typed.
    pub fn try_submit(&mut self, conversation: &mut Conversation) -> bool {
        if !self.is_submittable(conversation.is_in_flight()) {
            return false;
        }

        match conversation.submit(&self.buffer) {
            SubmitOutcome::Dispatched { .. } => {
                let sent = self.take();
                self.add_to_history(sent);
                true
            }
            SubmitOutcome::Rejected(reason) => {
                tracing::debug!(%reason, "draft not sent");
                false
            }
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Text before and after the cursor
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.buffer.split_at(self.byte_index(self.cursor))
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    /// Record a sent message; repeats of the last one are skipped
    pub fn add_to_history(&mut self, message: String) {
        if let Some(last) = self.message_history.last()
            && last == &message
        {
            self.reset_history_navigation();
            return;
        }
        self.message_history.push(message);
        self.reset_history_navigation();
    }

    /// Navigate up in history (older messages)
    pub fn navigate_up(&mut self) {
        if self.message_history.is_empty() {
            return;
        }

        if self.history_index.is_none() && !self.buffer.is_empty() {
            self.temp_buffer = Some(self.buffer.clone());
        }

        let new_index = match self.history_index {
            None => self.message_history.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };

        if let Some(message) = self.message_history.get(new_index) {
            self.buffer = message.clone();
            self.cursor = self.char_len();
            self.history_index = Some(new_index);
        }
    }

    /// Navigate down in history (newer messages), ending at the stashed draft
    pub fn navigate_down(&mut self) {
        let Some(idx) = self.history_index else {
            return;
        };

        if idx + 1 >= self.message_history.len() {
            self.buffer = self.temp_buffer.take().unwrap_or_default();
            self.history_index = None;
        } else {
            self.buffer = self.message_history[idx + 1].clone();
            self.history_index = Some(idx + 1);
        }
        self.cursor = self.char_len();
    }

    pub fn reset_history_navigation(&mut self) {
        self.history_index = None;
        self.temp_buffer = None;
    }

    pub fn is_navigating_history(&self) -> bool {
        self.history_index.is_some()
    }

    /// "2/5" while browsing history
    pub fn history_position(&self) -> Option<String> {
        self.history_index
            .map(|idx| format!("{}/{}", idx + 1, self.message_history.len()))
    }
}
