//! TUI state algebra: app model, events, actions, transitions.
//!
//! The session controller owns everything about timing. The app adds only
//! presentation state on top of it: which selector card is focused and
//! whether the completion acknowledgment is showing.

use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;

use crate::catalog::Catalog;
use crate::session::Session;
use crate::ticker::{TickSource, TimerId};

/// How long the completion acknowledgment stays up on its own.
pub const COMPLETION_DISPLAY: Duration = Duration::from_secs(5);

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Two producers feed a single mpsc channel:
/// - A key reader thread sends `Key` variants
/// - The session's ticker thread sends `Tick` variants
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key event from the crossterm reader thread.
    Key(KeyEvent),
    /// One second elapsed on the timer with this id.
    Tick(TimerId),
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Completion acknowledgment overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub shown_at: Instant,
}

impl Completion {
    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= COMPLETION_DISPLAY
    }
}

/// Top-level TUI model.
pub struct App<S: TickSource> {
    /// The breathing session controller.
    pub session: Session<S>,

    /// Modes offered in the selector.
    pub catalog: Catalog,

    /// Focused card in the mode selector.
    pub cursor: usize,

    /// Set while the completion acknowledgment is showing.
    pub completion: Option<Completion>,

    /// Set to true when the app should exit on the next loop turn.
    pub should_quit: bool,
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start when Idle or Completed, pause when Active, resume when Paused.
    Toggle,
    /// Stop and reset.
    Stop,
    /// Focus previous selector card.
    MoveLeft,
    /// Focus next selector card.
    MoveRight,
    /// Select the focused mode.
    Select,
    /// Select a mode by its 1-based position.
    NumberKey(u8),
    /// Close the completion acknowledgment.
    Dismiss,
    /// Quit the application.
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of handling an action or a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Keep running and redraw.
    Continue,
    /// Quit the application.
    Quit,
    /// Execute a side effect, then redraw.
    Effect(Effect),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Session just completed; show the acknowledgment.
    ShowCompletion,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl<S: TickSource> App<S> {
    /// Create an App with an Idle session on `mode_index`.
    pub fn new(catalog: Catalog, mode_index: usize, session_secs: u32, source: S) -> Self {
        let cursor = mode_index.min(catalog.len() - 1);
        let mode = catalog.modes()[cursor].clone();
        App {
            session: Session::new(mode, session_secs, source),
            catalog,
            cursor,
            completion: None,
            should_quit: false,
        }
    }

    /// Index of the session's mode in the catalog.
    pub fn selected_index(&self) -> Option<usize> {
        self.catalog.position(&self.session.mode().id)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::ManualTicker;
    use crate::types::SessionState;

    #[test]
    fn app_starts_idle_on_requested_mode() {
        let app = App::new(Catalog::builtin(), 1, 120, ManualTicker::default());
        assert_eq!(app.session.state(), SessionState::Idle);
        assert_eq!(app.session.mode().id, "focused");
        assert_eq!(app.cursor, 1);
        assert_eq!(app.selected_index(), Some(1));
        assert!(app.completion.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn out_of_range_mode_index_clamps_to_last() {
        let app = App::new(Catalog::builtin(), 9, 120, ManualTicker::default());
        assert_eq!(app.session.mode().id, "energize");
    }

    #[test]
    fn completion_expires_after_display_time() {
        let now = Instant::now();
        let completion = Completion { shown_at: now };
        assert!(!completion.expired(now));
        assert!(completion.expired(now + COMPLETION_DISPLAY));
    }
}
