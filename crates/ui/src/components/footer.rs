use crate::layout::{LayoutMode, TuiLayout};
use crate::{state::AppState, theme::ThemePalette};

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

/// Footer component: input composer card and key hints
///
/// - Row 1: separator
/// - Rows 2-5: input card with accent bar (shows the last lines of a multi-line draft)
/// - Row 6: send status and keyboard shortcuts
pub struct Footer<'a> {
    state: &'a AppState,
    theme: ThemePalette,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a AppState, theme: ThemePalette) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame<'_>, layout: &TuiLayout) {
        let rows = layout.footer_rows();
        let theme = self.theme;

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "─".repeat(rows.separator.width as usize),
                Style::default().fg(theme.border),
            ))),
            rows.separator,
        );

        self.render_input_card(frame, rows.input);
        self.render_hints(frame, rows.hints, layout.mode);
    }

    fn render_input_card(&self, frame: &mut Frame<'_>, area: Rect) {
        let theme = self.theme;
        if area.width < 10 || area.height < 1 {
            return;
        }

        frame.render_widget(Block::default().style(Style::default().bg(theme.panel_bg)), area);

        let accent_width = 2;
        let accent_color = if self.state.in_flight { theme.muted } else { theme.blue };
        let accent_area = Rect { x: area.x, y: area.y, width: accent_width, height: area.height };
        frame.render_widget(Block::default().style(Style::default().bg(accent_color)), accent_area);

        let input_area = Rect {
            x: area.x + accent_width + 1,
            y: area.y,
            width: area.width.saturating_sub(accent_width + 2),
            height: area.height,
        };

        let lines = self.input_lines();
        let skip = lines.len().saturating_sub(input_area.height as usize);
        let visible: Vec<Line<'static>> = lines.into_iter().skip(skip).collect();
        frame.render_widget(Paragraph::new(visible), input_area);
    }

    /// Draft split into display lines with a block cursor
    fn input_lines(&self) -> Vec<Line<'static>> {
        let theme = self.theme;
        let input = &self.state.input;
        let cursor = Span::styled("█", Style::default().fg(theme.fg).bg(theme.fg));

        if input.buffer.is_empty() {
            let (text, style) = if input.is_navigating_history() {
                ("<no message>".to_string(), Style::default().fg(theme.yellow).bg(theme.panel_bg))
            } else {
                (self.state.placeholder.clone(), Style::default().fg(theme.muted).bg(theme.panel_bg))
            };
            return vec![Line::from(vec![cursor, Span::styled(text, style)])];
        }

        let text_style = Style::default().fg(theme.fg).bg(theme.panel_bg);
        let (before, after) = input.split_at_cursor();
        let mut lines = Vec::new();
        let mut current: Vec<Span<'static>> = Vec::new();

        push_draft_text(before, text_style, &mut lines, &mut current);
        current.push(cursor);
        push_draft_text(after, text_style, &mut lines, &mut current);
        lines.push(Line::from(current));
        lines
    }

    fn render_hints(&self, frame: &mut Frame<'_>, area: Rect, mode: LayoutMode) {
        let theme = self.theme;
        let status = if self.state.in_flight {
            Span::styled("Sending...", Style::default().fg(theme.yellow).bold())
        } else if self.state.is_submittable() {
            Span::styled("Ready", Style::default().fg(theme.green))
        } else {
            Span::styled("Type a question", theme.muted())
        };

        frame.render_widget(Paragraph::new(Line::from(vec![Span::raw(" "), status])), area);

        if mode == LayoutMode::Compact {
            return;
        }

        let hints = Paragraph::new(Line::from(self.hint_spans())).alignment(Alignment::Right);
        frame.render_widget(hints, area);
    }

    fn hint_spans(&self) -> Vec<Span<'static>> {
        let theme = self.theme;
        let mut pairs =
            vec![("[Enter]", " send"), ("[Alt+Enter]", " newline"), ("[Tab]", " sources"), ("[Ctrl+O]", " toggle")];
        if self.state.input.message_history.len() > 1 {
            pairs.insert(2, ("[↑↓]", " history"));
        }
        pairs.push(("[Esc]", " exit"));

        let mut spans = Vec::new();
        for (i, (key, label)) in pairs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(key, Style::default().fg(theme.blue)));
            spans.push(Span::styled(label, theme.muted()));
        }
        if let Some(position) = self.state.input.history_position() {
            spans.push(Span::styled(format!("  [{}]", position), theme.muted()));
        }
        spans.push(Span::raw(" "));
        spans
    }
}

/// Append `text` to the line being built, starting a new line at each '\n'
fn push_draft_text(text: &str, style: Style, lines: &mut Vec<Line<'static>>, current: &mut Vec<Span<'static>>) {
    let mut parts = text.split('\n');
    if let Some(first) = parts.next()
        && !first.is_empty()
    {
        current.push(Span::styled(first.to_string(), style));
    }
    for part in parts {
        lines.push(Line::from(std::mem::take(current)));
        if !part.is_empty() {
            current.push(Span::styled(part.to_string(), style));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_placeholder_when_empty() {
        let state = AppState::default();
        let footer = Footer::new(&state, Theme::palette());
        let lines = texts(&footer.input_lines());
        assert_eq!(lines, vec![format!("█{}", state.placeholder)]);
    }

    #[test]
    fn test_cursor_inside_multiline_draft() {
        let mut state = AppState::default();
        state.input.set_draft("first\nsecond");
        state.input.move_left();
        state.input.move_left();

        let footer = Footer::new(&state, Theme::palette());
        assert_eq!(texts(&footer.input_lines()), vec!["first".to_string(), "seco█nd".to_string()]);
    }

    #[test]
    fn test_trailing_newline_puts_cursor_on_new_line() {
        let mut state = AppState::default();
        state.input.set_draft("line\n");

        let footer = Footer::new(&state, Theme::palette());
        assert_eq!(texts(&footer.input_lines()), vec!["line".to_string(), "█".to_string()]);
    }

    #[test]
    fn test_history_hint() {
        let mut state = AppState::default();
        state.input.add_to_history("a".to_string());
        state.input.add_to_history("b".to_string());

        let footer = Footer::new(&state, Theme::palette());
        let hints: String = footer.hint_spans().iter().map(|s| s.content.as_ref()).collect();
        assert!(hints.contains("[↑↓] history"));
    }
}
