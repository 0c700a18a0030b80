use super::App;
use crate::event_handler::EventHandler;

use cdpchat_core::Result;
use crossterm::event::Event;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{panic, time::Duration};

const TICK: Duration = Duration::from_millis(100);
const POLL: Duration = Duration::from_millis(10);

pub async fn run(app: &mut App) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );
        original_hook(panic_info);
    }));

    terminal.clear()?;
    let outcome = drive(app, &mut terminal).await;

    app.conversation.shutdown();
    terminal.show_cursor()?;
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;

    outcome
}

async fn drive(app: &mut App, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    terminal.draw(|frame| app.render(frame))?;

    while !app.should_exit {
        let tui_poll = async {
            tokio::time::sleep(TICK).await;
            EventHandler::read(POLL)
        };

        tokio::select! {
            maybe_event = tui_poll => {
                match maybe_event? {
                    Some(Event::Key(key)) => {
                        if let Some(action) = EventHandler::handle_key_event(key, &mut app.state) {
                            app.handle_key_action(action);
                        }
                    }
                    Some(Event::Resize(..)) | None => {}
                    Some(_) => continue,
                }
                if app.state.in_flight {
                    app.state.ui.advance_animation_frame();
                }
            }
            maybe_dispatch = app.conversation.next_event() => {
                if let Some(event) = maybe_dispatch
                    && let Err(e) = app.handle_dispatch(event)
                {
                    tracing::warn!(error = %e, "dropped request completion");
                }
            }
            changed = app.changes.changed() => {
                if changed.is_ok() {
                    let change = *app.changes.borrow_and_update();
                    app.on_transcript_change(change);
                }
            }
        }

        terminal.draw(|frame| app.render(frame))?;
    }

    Ok(())
}
