//! Terminal UI for kilo, the default interactive surface.
//!
//! The event loop runs on [`tokio::select!`] with a 60 fps render tick,
//! crossterm's async [`EventStream`](crossterm::event::EventStream) and the
//! channel fed by the exchange task. Exchanges run on a spawned task that
//! borrows nothing from the loop: it takes a transcript by value and sends it
//! back in [`RenderEvent::Finished`].

mod app;
mod logo;
mod renderer;
mod ui;

pub use app::App;
pub use renderer::{RenderEvent, TuiRenderer};
pub use ui::draw;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{interval, Duration};

use crate::agent::Orchestrator;
use crate::cli::Session;
use crate::transcript::Transcript;

/// Render tick interval (~60 fps).
const TICK_DURATION: Duration = Duration::from_millis(16);

/// What a key press asks the loop to do.
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Continue,
    Quit,
    Submit,
}

/// Launches the TUI event loop.
///
/// Enters raw mode and the alternate screen; restores the terminal on exit
/// (Esc or Ctrl+C), even when the loop returns an error.
pub async fn run_tui(session: Session) -> Result<()> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;

    let result = event_loop(session.orchestrator).await;

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

async fn event_loop(orchestrator: Arc<Orchestrator>) -> Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let mut events = EventStream::new();
    let mut tick = interval(TICK_DURATION);
    let (tx, mut rx) = mpsc::channel::<RenderEvent>(1000);
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                app.tick_spinner();
                terminal.draw(|f| draw(f, &app))?;
            }
            event = events.next() => {
                match event {
                    Some(Ok(Event::Key(key))) => match handle_key(&mut app, key) {
                        KeyAction::Quit => break,
                        KeyAction::Submit => {
                            if let Some((input, transcript)) = app.submit() {
                                in_flight = Some(spawn_exchange(
                                    orchestrator.clone(),
                                    transcript,
                                    input,
                                    tx.clone(),
                                ));
                            }
                        }
                        KeyAction::Continue => {}
                    },
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                    _ => {}
                }
            }
            Some(render_event) = rx.recv() => {
                if matches!(render_event, RenderEvent::Finished { .. }) {
                    in_flight = None;
                }
                app.handle_render_event(render_event);
            }
            joined = join_in_flight(&mut in_flight) => {
                in_flight = None;
                // A clean exit has already queued Finished on the channel.
                if let Err(e) = joined {
                    tracing::error!(error = %e, "exchange task ended abnormally");
                    app.exchange_aborted(format!("exchange task ended abnormally: {e}"));
                }
            }
        }
    }

    // Dropping the task kills any running tool process.
    if let Some(handle) = in_flight {
        handle.abort();
    }
    Ok(())
}

/// Resolves when the in-flight exchange task ends; never resolves when idle.
async fn join_in_flight(handle: &mut Option<JoinHandle<()>>) -> Result<(), JoinError> {
    match handle {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Runs one exchange off the event loop.
fn spawn_exchange(
    orchestrator: Arc<Orchestrator>,
    mut transcript: Transcript,
    input: String,
    tx: mpsc::Sender<RenderEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut renderer = TuiRenderer::new(tx.clone());
        let result = orchestrator
            .run_exchange(&mut transcript, &input, &mut renderer)
            .await
            .map_err(|e| e.to_string());
        let _ = tx.send(RenderEvent::Finished { transcript, result }).await;
    })
}

/// Maps a key event to an action, editing the input buffer in place.
fn handle_key(app: &mut App, key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Continue;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Enter => return KeyAction::Submit,
        KeyCode::Char(c) => app.push_char(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new();
        assert_eq!(handle_key(&mut app, key(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(
            handle_key(
                &mut app,
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
            ),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut app = App::new();
        handle_key(&mut app, key(KeyCode::Char('h')));
        handle_key(&mut app, key(KeyCode::Char('i')));
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.input, "h");
        assert_eq!(handle_key(&mut app, key(KeyCode::Enter)), KeyAction::Submit);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut app = App::new();
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        assert_eq!(handle_key(&mut app, release), KeyAction::Continue);
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn test_join_in_flight_reports_panicked_task() {
        let mut handle: Option<JoinHandle<()>> = Some(tokio::spawn(async {
            panic!("tool blew up");
        }));
        let err = join_in_flight(&mut handle).await.unwrap_err();
        assert!(err.is_panic());
    }

    #[tokio::test]
    async fn test_join_in_flight_idle_never_resolves() {
        let mut handle: Option<JoinHandle<()>> = None;
        let waited =
            tokio::time::timeout(Duration::from_millis(20), join_in_flight(&mut handle)).await;
        assert!(waited.is_err());
    }
}
