use crate::layout::LayoutMode;
use crate::{state::AppState, theme::ThemePalette};

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

/// Header component: title, subtitle, and where questions are sent
pub struct Header<'a> {
    state: &'a AppState,
    theme: ThemePalette,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, theme: ThemePalette) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let theme = self.theme;
        let mode = LayoutMode::from(area.width);
        let header = &self.state.header;

        let title = Line::from(vec![
            Span::styled(" ◆ ", Style::default().fg(theme.cyan)),
            Span::styled(header.title.clone(), Style::default().fg(theme.fg).bold()),
        ]);
        frame.render_widget(Paragraph::new(title), Rect { height: 1, ..area });

        let status = if self.state.in_flight { "● waiting" } else { "● ready" };
        let mut right = Vec::new();
        let used = header.title.width() + status.width() + 6;
        if mode == LayoutMode::Full && !header.channel.is_empty() && used + header.channel.width() <= area.width as usize
        {
            right.push(Span::styled(header.channel.clone(), self.theme.muted()));
            right.push(Span::raw("  "));
        }
        right.push(Span::styled(status, Style::default().fg(theme.status_color(self.state.in_flight))));
        right.push(Span::raw(" "));
        frame.render_widget(Paragraph::new(Line::from(right)).alignment(Alignment::Right), Rect { height: 1, ..area });

        if area.height > 1 && mode == LayoutMode::Full {
            let subtitle = Line::from(vec![Span::raw("   "), Span::styled(header.subtitle.clone(), theme.muted())]);
            frame.render_widget(Paragraph::new(subtitle), Rect { y: area.y + 1, height: 1, ..area });
        }
    }
}
