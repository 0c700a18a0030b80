use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout breakpoints
///
/// Narrow terminals drop the header subtitle and the key hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// >= 80 columns
    Full,
    /// < 80 columns
    Compact,
}

impl From<u16> for LayoutMode {
    fn from(width: u16) -> Self {
        if width >= 80 { Self::Full } else { Self::Compact }
    }
}

/// Calculated layout for the chat screen
#[derive(Debug, Clone)]
pub struct TuiLayout {
    pub mode: LayoutMode,
    /// Title and subtitle (2 lines)
    pub header: Rect,
    pub transcript: Rect,
    /// Separator, input card, hints
    pub footer: Rect,
}

impl TuiLayout {
    pub const HEADER_HEIGHT: u16 = 2;
    pub const FOOTER_HEIGHT: u16 = 6;

    pub fn calculate(area: Rect) -> Self {
        let mode = LayoutMode::from(area.width);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Self::HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(Self::FOOTER_HEIGHT),
            ])
            .split(area);

        Self { mode, header: chunks[0], transcript: chunks[1], footer: chunks[2] }
    }

    /// Footer rows: separator, input card (4 lines), status and hints
    pub fn footer_rows(&self) -> FooterRows {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(4), Constraint::Length(1)])
            .split(self.footer);

        FooterRows { separator: rows[0], input: rows[1], hints: rows[2] }
    }
}

pub struct FooterRows {
    pub separator: Rect,
    pub input: Rect,
    pub hints: Rect,
}

/// Shrink `area` by the given margins, or return it unchanged when too small
pub fn inset_area(area: Rect, left: u16, right: u16, top: u16, bottom: u16) -> Rect {
    let width = area.width.saturating_sub(left + right);
    let height = area.height.saturating_sub(top + bottom);
    if width == 0 || height == 0 {
        return area;
    }
    Rect { x: area.x + left, y: area.y + top, width, height }
}
