use super::App;
use crate::components::{Footer, Header, Transcript};
use crate::layout::{TuiLayout, inset_area};
use crate::theme::Theme;

use ratatui::{Frame, style::Style, widgets::Block};

pub fn draw(app: &mut App, frame: &mut Frame<'_>) {
    let size = frame.area();
    let theme = Theme::palette();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), size);

    let layout = TuiLayout::calculate(inset_area(size, 1, 1, 0, 0));

    Header::new(&app.state, theme).render(frame, layout.header);
    Transcript::new(app.conversation.entries(), theme).render(frame, layout.transcript, &mut app.state);
    Footer::new(&app.state, theme).render(frame, &layout);
}
