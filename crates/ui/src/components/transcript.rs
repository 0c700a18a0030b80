use crate::state::AppState;
use crate::theme::ThemePalette;
use crate::transcript::{EntryView, render_entry};

use cdpchat_core::TranscriptEntry;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Paragraph},
};

/// Scrolling view over the whole transcript
pub struct Transcript<'a> {
    entries: &'a [TranscriptEntry],
    theme: ThemePalette,
}

impl<'a> Transcript<'a> {
    pub fn new(entries: &'a [TranscriptEntry], theme: ThemePalette) -> Self {
        Self { entries, theme }
    }

    /// All entries as lines, `width` columns wide
    pub fn lines(&self, state: &AppState, width: usize) -> Vec<Line<'static>> {
        self.entries
            .iter()
            .flat_map(|entry| {
                let view = EntryView {
                    citations_visible: state.citations.is_visible(entry.id),
                    focused: state.citations.focused() == Some(entry.id),
                    animation_frame: state.ui.animation_frame,
                };
                render_entry(entry, view, width, &self.theme)
            })
            .collect()
    }

    /// Render into `area`, recording the viewport in `state` for paging
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, state: &mut AppState) {
        let inner = crate::layout::inset_area(area, 1, 1, 0, 0);
        let lines = self.lines(state, inner.width as usize);
        let top = state.ui.viewport(lines.len(), inner.height);

        let paragraph = Paragraph::new(Text::from(lines))
            .block(Block::default().style(Style::default().bg(self.theme.bg)))
            .scroll((top, 0));
        frame.render_widget(paragraph, inner);
    }
}
