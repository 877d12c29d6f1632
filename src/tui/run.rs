//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only TUI module with side effects. It wires the session
//! and the pure layers (state, update, view) to the real terminal via
//! crossterm and ratatui.
//!
//! Architecture: two producers feed a single mpsc channel.
//! - Key reader thread: forwards crossterm key events
//! - Ticker thread: armed by the session while it is Active
//! The event loop consumes from the channel, dispatching to the handlers.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::ticker::ThreadTicker;

use super::state::{Action, App, AppEvent, Transition};
use super::update::{apply_effect, expire_completion, handle_tick, update};
use super::view::render;

/// How often the loop wakes without input, to expire the overlay.
const IDLE_POLL: Duration = Duration::from_millis(250);

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        // Session
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(Action::Toggle),
        KeyCode::Char('s') | KeyCode::Char('x') => Some(Action::Stop),

        // Mode selector
        KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveRight),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Char(c @ '1'..='9') => Some(Action::NumberKey(c as u8 - b'0')),

        KeyCode::Esc => Some(Action::Dismiss),
        KeyCode::Char('q') => Some(Action::Quit),

        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards key presses to the channel.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break; // receiver dropped, TUI is shutting down
                    }
                }
                Ok(_) => {} // ignore releases, mouse, resize, etc.
                Err(_) => break,
            }
        }
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the TUI until the user quits.
pub fn run(catalog: Catalog, mode_index: usize, session_secs: u32) -> Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let (tx, rx) = mpsc::channel::<AppEvent>();
    let ticker = ThreadTicker::new(tx.clone(), AppEvent::Tick);
    let mut app = App::new(catalog, mode_index, session_secs, ticker);

    spawn_key_reader(tx);
    info!(mode = %app.session.mode().id, secs = session_secs, "tui started");

    let result = event_loop(&mut terminal, &mut app, &rx);

    restore_terminal()?;
    info!("tui exited");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<ThreadTicker<AppEvent>>,
    rx: &mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        let transition = match rx.recv_timeout(IDLE_POLL) {
            Ok(AppEvent::Key(key)) => match map_key(key) {
                Some(action) => update(app, &action),
                None => Transition::Continue,
            },
            Ok(AppEvent::Tick(id)) => handle_tick(app, id),
            Err(RecvTimeoutError::Timeout) => Transition::Continue,
            // Key reader gone and no timer armed; nothing can wake us.
            Err(RecvTimeoutError::Disconnected) => Transition::Quit,
        };

        match transition {
            Transition::Continue => {}
            Transition::Quit => app.should_quit = true,
            Transition::Effect(effect) => apply_effect(app, effect, Instant::now()),
        }

        expire_completion(app, Instant::now());
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Quit));
    }

    #[test]
    fn space_toggles_session() {
        assert_eq!(map_key(key(KeyCode::Char(' '))), Some(Action::Toggle));
        assert_eq!(map_key(key(KeyCode::Char('p'))), Some(Action::Toggle));
    }

    #[test]
    fn s_stops_session() {
        assert_eq!(map_key(key(KeyCode::Char('s'))), Some(Action::Stop));
    }

    #[test]
    fn arrow_and_vim_keys_move_selector() {
        assert_eq!(map_key(key(KeyCode::Left)), Some(Action::MoveLeft));
        assert_eq!(map_key(key(KeyCode::Char('l'))), Some(Action::MoveRight));
    }

    #[test]
    fn number_keys_map_to_number_actions() {
        for n in 1..=9u8 {
            let k = key(KeyCode::Char((b'0' + n) as char));
            assert_eq!(map_key(k), Some(Action::NumberKey(n)));
        }
    }

    #[test]
    fn enter_selects_and_esc_dismisses() {
        assert_eq!(map_key(key(KeyCode::Enter)), Some(Action::Select));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Action::Dismiss));
    }

    #[test]
    fn unmapped_key_returns_none() {
        assert_eq!(map_key(key(KeyCode::Char('z'))), None);
    }
}
