use cdpchat_agent::{Conversation, DispatcherSettings};
use cdpchat_core::{ChatConfig, Citation};
use cdpchat_providers::{MockChannel, MockResponse};
use cdpchat_ui::{App, KeyAction};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::sync::Arc;

fn create_test_app(responses: Vec<MockResponse>) -> App {
    let chat = ChatConfig::default();
    let conversation = Conversation::new(
        Arc::new(MockChannel::new(responses)),
        DispatcherSettings::default(),
        chat.welcome_message.clone(),
    );
    App::new(conversation, &chat)
}

fn segment_answer() -> MockResponse {
    MockResponse::Answer {
        text: "Create a source in the Segment workspace, then copy its write key.".to_string(),
        citations: vec![Citation::new(
            "Sources Overview",
            "https://segment.com/docs/connections/sources/",
            "Segment",
        )],
        query_type: Some("how_to".to_string()),
    }
}

fn draw(app: &mut App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    buffer_to_string(terminal.backend().buffer())
}

async fn ask(app: &mut App, question: &str) {
    app.state_mut().input.set_draft(question);
    app.handle_key_action(KeyAction::Submit);
}

async fn settle(app: &mut App) {
    let event = app.next_dispatch().await.unwrap();
    app.handle_dispatch(event).unwrap();
}

#[test]
fn test_initial_screen() {
    let mut app = create_test_app(vec![]);
    let content = draw(&mut app, 100, 30);

    assert!(content.contains("CDP Support Assistant"));
    assert!(content.contains("Hi there!"));
    assert!(content.contains("Ask a question about CDPs..."));
    assert!(content.contains("Type a question"));
    assert!(content.contains("[Enter] send"));
}

#[tokio::test]
async fn test_pending_entry_while_waiting() {
    let mut app = create_test_app(vec![segment_answer()]);
    ask(&mut app, "How do I set up Segment?").await;

    let content = draw(&mut app, 100, 30);
    assert!(content.contains("You"));
    assert!(content.contains("How do I set up Segment?"));
    assert!(content.contains("Sending..."));
    assert!(content.contains("● waiting"));
}

#[tokio::test]
async fn test_answer_with_sources_toggle() {
    let mut app = create_test_app(vec![segment_answer()]);
    ask(&mut app, "How do I set up Segment?").await;
    settle(&mut app).await;

    let content = draw(&mut app, 100, 30);
    assert!(content.contains("Create a source in the Segment workspace"));
    assert!(content.contains("· how_to"));
    assert!(content.contains("Show sources (1)"));
    assert!(!content.contains("Sources Overview"));

    app.handle_key_action(KeyAction::ToggleCitations);
    let content = draw(&mut app, 100, 30);
    assert!(content.contains("Hide sources"));
    assert!(content.contains("Sources Overview (Segment)"));
    assert!(content.contains("https://segment.com/docs/connections/sources/"));

    app.handle_key_action(KeyAction::ToggleCitations);
    let content = draw(&mut app, 100, 30);
    assert!(!content.contains("Sources Overview"));
}

#[tokio::test]
async fn test_failed_request_shows_fixed_message() {
    let mut app = create_test_app(vec![MockResponse::Error { message: "connection refused".to_string() }]);
    ask(&mut app, "What is Zeotap?").await;
    settle(&mut app).await;

    let content = draw(&mut app, 100, 30);
    assert!(content.contains("Sorry, I encountered an error processing your question."));
    assert!(!content.contains("connection refused"));
    assert!(content.contains("● ready"));
}

#[tokio::test]
async fn test_compact_layout_hides_hints() {
    let mut app = create_test_app(vec![]);
    let content = draw(&mut app, 60, 24);

    assert!(content.contains("CDP Support Assistant"));
    assert!(!content.contains("[Enter] send"));
}

fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let mut s = String::new();
    for y in 0..buffer.area().height {
        for x in 0..buffer.area().width {
            s.push(buffer[(x, y)].symbol().chars().next().unwrap_or(' '));
        }
        s.push('\n');
    }
    s
}
