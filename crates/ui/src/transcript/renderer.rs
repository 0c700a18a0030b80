use super::wrap::{highlight_urls, wrap_to_width};
use crate::theme::ThemePalette;

use cdpchat_core::{EntryStatus, Role, TranscriptEntry};
use ratatui::{
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
};

/// Per-entry view flags the transcript does not carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryView {
    pub citations_visible: bool,
    pub focused: bool,
    /// Loading indicator frame for pending entries
    pub animation_frame: u8,
}

/// Loading indicator for a pending entry
pub fn loading_dots(frame: u8) -> &'static str {
    match frame % 4 {
        0 => "●∙∙",
        1 => "∙●∙",
        2 => "∙∙●",
        _ => "∙●∙",
    }
}

pub fn sources_label(visible: bool, count: usize) -> String {
    if visible { "▾ Hide sources".to_string() } else { format!("▸ Show sources ({})", count) }
}

/// Render one transcript entry as display lines, `width` columns wide.
///
/// Pure: the same entry, view and width always give the same lines.
pub fn render_entry(entry: &TranscriptEntry, view: EntryView, width: usize, theme: &ThemePalette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match entry.role {
        Role::User => render_user(entry, width, theme, &mut lines),
        Role::Bot => match entry.status {
            Some(EntryStatus::Pending) => render_pending(view, theme, &mut lines),
            Some(EntryStatus::Failed) => render_failed(entry, width, theme, &mut lines),
            _ => render_answer(entry, view, width, theme, &mut lines),
        },
    }
    lines.push(Line::default());
    lines
}

fn render_user(entry: &TranscriptEntry, width: usize, theme: &ThemePalette, lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from(vec![
        Span::styled("● ", Style::default().fg(theme.blue)),
        Span::styled("You", Style::default().fg(theme.blue).bold()),
    ]));

    let accent_bar = Span::styled("┃ ", Style::default().fg(theme.blue).bg(theme.bg));
    for source_line in entry.text.lines() {
        for wrapped in wrap_to_width(source_line, width.saturating_sub(2)) {
            lines.push(Line::from(vec![accent_bar.clone(), Span::styled(wrapped, theme.text())]));
        }
    }
}

fn bot_heading(theme: &ThemePalette, color: ratatui::style::Color, query_type: Option<&str>) -> Line<'static> {
    let mut spans = vec![
        Span::styled("◆ ", Style::default().fg(color)),
        Span::styled("Assistant", Style::default().fg(color).bold()),
    ];
    if let Some(kind) = query_type {
        spans.push(Span::styled(format!(" · {}", kind), theme.muted()));
    }
    Line::from(spans)
}

fn render_pending(view: EntryView, theme: &ThemePalette, lines: &mut Vec<Line<'static>>) {
    lines.push(bot_heading(theme, theme.cyan, None));
    lines.push(Line::from(vec![
        Span::styled("  ", theme.text()),
        Span::styled(loading_dots(view.animation_frame), Style::default().fg(theme.cyan)),
    ]));
}

fn render_failed(entry: &TranscriptEntry, width: usize, theme: &ThemePalette, lines: &mut Vec<Line<'static>>) {
    lines.push(bot_heading(theme, theme.red, None));
    for source_line in entry.text.lines() {
        for wrapped in wrap_to_width(source_line, width.saturating_sub(2)) {
            lines.push(Line::from(vec![Span::styled("✗ ", theme.error()), Span::styled(wrapped, theme.error())]));
        }
    }
}

fn render_answer(
    entry: &TranscriptEntry, view: EntryView, width: usize, theme: &ThemePalette, lines: &mut Vec<Line<'static>>,
) {
    lines.push(bot_heading(theme, theme.cyan, entry.query_type.as_deref()));

    for source_line in entry.text.lines() {
        if source_line.trim().is_empty() {
            lines.push(Line::default());
            continue;
        }
        for wrapped in wrap_to_width(source_line, width) {
            lines.push(Line::from(highlight_urls(&wrapped, theme.text(), theme.link())));
        }
    }

    if entry.has_citations() {
        render_sources(entry, view, width, theme, lines);
    }
}

fn render_sources(
    entry: &TranscriptEntry, view: EntryView, width: usize, theme: &ThemePalette, lines: &mut Vec<Line<'static>>,
) {
    let mut toggle_style = Style::default().fg(theme.blue).bg(theme.bg);
    if view.focused {
        toggle_style = toggle_style.bg(theme.active).add_modifier(Modifier::BOLD);
    }
    lines.push(Line::from(vec![
        Span::styled("  ", theme.text()),
        Span::styled(sources_label(view.citations_visible, entry.citations.len()), toggle_style),
    ]));

    if !view.citations_visible {
        return;
    }

    lines.push(Line::from(Span::styled("  Sources:", theme.muted())));
    for citation in &entry.citations {
        let label = format!("{} ({})", citation.title, citation.source_label);
        for wrapped in wrap_to_width(&label, width.saturating_sub(4)) {
            lines.push(Line::from(vec![Span::styled("  • ", theme.muted()), Span::styled(wrapped, theme.text())]));
        }
        for wrapped in wrap_to_width(&citation.url, width.saturating_sub(4)) {
            lines.push(Line::from(vec![Span::styled("    ", theme.text()), Span::styled(wrapped, theme.link())]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use cdpchat_core::{Citation, NewEntry, Resolution, TranscriptStore};

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn all_text(lines: &[Line<'_>]) -> String {
        lines.iter().map(line_text).collect::<Vec<_>>().join("\n")
    }

    fn answered(citations: Vec<Citation>) -> TranscriptEntry {
        let mut store = TranscriptStore::new();
        let id = store.append(NewEntry::pending_bot());
        store
            .update_pending(
                id,
                Resolution::Resolved {
                    text: "Create a source, then see https://segment.com/docs for details.".to_string(),
                    citations,
                    query_type: Some("how-to".to_string()),
                },
            )
            .unwrap();
        store.get(id).unwrap().clone()
    }

    fn segment_citation() -> Citation {
        Citation::new("Sources Overview", "https://segment.com/docs/connections/sources/", "Segment")
    }

    #[test]
    fn test_render_user_entry() {
        let mut store = TranscriptStore::new();
        let id = store.append(NewEntry::user("How do I set up Segment?"));
        let lines = render_entry(store.get(id).unwrap(), EntryView::default(), 60, &Theme::palette());

        let text = all_text(&lines);
        assert!(text.contains("You"));
        assert!(text.contains("┃ How do I set up Segment?"));
    }

    #[test]
    fn test_render_pending_shows_loading() {
        let mut store = TranscriptStore::new();
        let id = store.append(NewEntry::pending_bot());
        let entry = store.get(id).unwrap();

        let frame0 = all_text(&render_entry(entry, EntryView::default(), 60, &Theme::palette()));
        let view = EntryView { animation_frame: 1, ..EntryView::default() };
        let frame1 = all_text(&render_entry(entry, view, 60, &Theme::palette()));

        assert!(frame0.contains(loading_dots(0)));
        assert!(frame1.contains(loading_dots(1)));
        assert_ne!(frame0, frame1);
    }

    #[test]
    fn test_render_failed_in_error_color() {
        let theme = Theme::palette();
        let mut store = TranscriptStore::new();
        let id = store.append(NewEntry::pending_bot());
        store.update_pending(id, Resolution::Failed { text: "Sorry, try again.".to_string() }).unwrap();

        let lines = render_entry(store.get(id).unwrap(), EntryView::default(), 60, &theme);
        let body = lines.iter().find(|l| line_text(l).contains("Sorry")).unwrap();
        assert!(body.spans.iter().all(|s| s.style.fg == Some(theme.red)));
    }

    #[test]
    fn test_sources_hidden_by_default() {
        let entry = answered(vec![segment_citation()]);
        let text = all_text(&render_entry(&entry, EntryView::default(), 80, &Theme::palette()));

        assert!(text.contains("Show sources (1)"));
        assert!(!text.contains("Sources:"));
        assert!(!text.contains("Sources Overview"));
        assert!(text.contains("· how-to"));
    }

    #[test]
    fn test_sources_visible() {
        let entry = answered(vec![segment_citation()]);
        let view = EntryView { citations_visible: true, ..EntryView::default() };
        let text = all_text(&render_entry(&entry, view, 80, &Theme::palette()));

        assert!(text.contains("Hide sources"));
        assert!(text.contains("Sources:"));
        assert!(text.contains("• Sources Overview (Segment)"));
        assert!(text.contains("https://segment.com/docs/connections/sources/"));
    }

    #[test]
    fn test_no_toggle_without_citations() {
        let entry = answered(Vec::new());
        let view = EntryView { citations_visible: true, ..EntryView::default() };
        let text = all_text(&render_entry(&entry, view, 80, &Theme::palette()));
        assert!(!text.contains("sources"));
    }

    #[test]
    fn test_urls_highlighted_in_answer() {
        let theme = Theme::palette();
        let entry = answered(Vec::new());
        let lines = render_entry(&entry, EntryView::default(), 120, &theme);

        let url_span = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .find(|s| s.content == "https://segment.com/docs")
            .unwrap();
        assert_eq!(url_span.style, theme.link());
    }

    #[test]
    fn test_focus_highlights_toggle() {
        let theme = Theme::palette();
        let entry = answered(vec![segment_citation()]);
        let view = EntryView { focused: true, ..EntryView::default() };
        let lines = render_entry(&entry, view, 80, &theme);

        let toggle = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .find(|s| s.content.contains("Show sources"))
            .unwrap();
        assert_eq!(toggle.style.bg, Some(theme.active));
    }

    #[test]
    fn test_render_is_deterministic() {
        let entry = answered(vec![segment_citation()]);
        let view = EntryView { citations_visible: true, focused: true, animation_frame: 2 };
        let theme = Theme::palette();
        assert_eq!(render_entry(&entry, view, 40, &theme), render_entry(&entry, view, 40, &theme));
    }

    #[test]
    fn test_wraps_to_width() {
        let entry = answered(vec![segment_citation()]);
        let lines = render_entry(&entry, EntryView::default(), 20, &Theme::palette());
        assert!(lines.iter().all(|l| l.width() <= 20));
    }
}
