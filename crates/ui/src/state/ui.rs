/// Transcript viewport and animation state
#[derive(Debug, Clone, Default)]
pub struct UIState {
    /// Lines scrolled up from the bottom; 0 follows the newest entry
    pub scroll_from_bottom: u16,
    /// Height of the transcript area at the last draw
    pub viewport_height: u16,
    /// Loading indicator frame (0-3 cycle)
    pub animation_frame: u8,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_animation_frame(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 4;
    }

    fn page(&self) -> u16 {
        self.viewport_height.saturating_sub(2).max(1)
    }

    pub fn page_up(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(self.page());
    }

    pub fn page_down(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(self.page());
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }

    pub fn is_following(&self) -> bool {
        self.scroll_from_bottom == 0
    }

    /// Record the viewport for `content_lines` of transcript and return the
    /// top line to draw. Clamps the offset so the top is never passed.
    pub fn viewport(&mut self, content_lines: usize, height: u16) -> u16 {
        self.viewport_height = height;
        let max_offset = content_lines.saturating_sub(height as usize).min(u16::MAX as usize) as u16;
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_offset);
        max_offset - self.scroll_from_bottom
    }
}
