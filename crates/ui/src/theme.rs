use ratatui::style::{Color, Modifier, Style};

/// Iceberg color theme
///
/// Based on iceberg.vim color scheme (https://github.com/cocopon/iceberg.vim)
#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Rgb(22, 24, 33);
    pub const FG: Color = Color::Rgb(198, 200, 209);
    /// Secondary background: input card, focused rows
    pub const PANEL_BG: Color = Color::Rgb(30, 33, 50);
    pub const ACTIVE: Color = Color::Rgb(39, 44, 66);
    pub const BLUE: Color = Color::Rgb(132, 160, 198);
    pub const CYAN: Color = Color::Rgb(137, 184, 194);
    pub const PURPLE: Color = Color::Rgb(160, 147, 199);
    pub const GREEN: Color = Color::Rgb(180, 190, 130);
    pub const YELLOW: Color = Color::Rgb(226, 164, 120);
    pub const RED: Color = Color::Rgb(226, 120, 120);
    pub const MUTED: Color = Color::Rgb(107, 112, 137);
    pub const BORDER: Color = Color::Rgb(60, 65, 90);

    pub fn palette() -> ThemePalette {
        ThemePalette::default()
    }
}

/// Resolved colors handed to render functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub bg: Color,
    pub fg: Color,
    pub panel_bg: Color,
    pub active: Color,
    pub blue: Color,
    pub cyan: Color,
    pub purple: Color,
    pub green: Color,
    pub yellow: Color,
    pub red: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self {
            bg: Theme::BG,
            fg: Theme::FG,
            panel_bg: Theme::PANEL_BG,
            active: Theme::ACTIVE,
            blue: Theme::BLUE,
            cyan: Theme::CYAN,
            purple: Theme::PURPLE,
            green: Theme::GREEN,
            yellow: Theme::YELLOW,
            red: Theme::RED,
            muted: Theme::MUTED,
            border: Theme::BORDER,
        }
    }
}

impl ThemePalette {
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted).bg(self.bg)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.red).bg(self.bg)
    }

    pub fn link(&self) -> Style {
        Style::default().fg(self.cyan).bg(self.bg).add_modifier(Modifier::UNDERLINED)
    }

    /// Ready/busy indicator color
    pub fn status_color(&self, in_flight: bool) -> Color {
        if in_flight { self.yellow } else { self.green }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_values() {
        assert!(matches!(Theme::BG, Color::Rgb(_, _, _)));
        assert!(matches!(Theme::FG, Color::Rgb(_, _, _)));
        assert!(matches!(Theme::PANEL_BG, Color::Rgb(_, _, _)));
    }

    #[test]
    fn test_palette_matches_constants() {
        let palette = Theme::palette();
        assert_eq!(palette.bg, Theme::BG);
        assert_eq!(palette.red, Theme::RED);
    }

    #[test]
    fn test_styles() {
        let palette = Theme::palette();
        let text = palette.text();
        assert_eq!(text.fg, Some(Theme::FG));
        assert_eq!(text.bg, Some(Theme::BG));

        assert_eq!(palette.error().fg, Some(Theme::RED));
        assert!(palette.link().add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_status_color() {
        let palette = Theme::palette();
        assert_eq!(palette.status_color(false), Theme::GREEN);
        assert_eq!(palette.status_color(true), Theme::YELLOW);
    }
}
