//! State transitions: (App, Action) → Transition.
//!
//! Actions are mapped onto session commands here. The session decides
//! whether a command applies; this layer only adds selector and overlay
//! handling. Fully testable without a terminal.

use std::time::Instant;

use tracing::debug;

use crate::session::TickOutcome;
use crate::ticker::{TickSource, TimerId};
use crate::types::SessionState;

use super::state::{Action, App, Completion, Effect, Transition};

/// Handle one user action.
pub fn update<S: TickSource>(app: &mut App<S>, action: &Action) -> Transition {
    if *action == Action::Quit {
        return Transition::Quit;
    }

    // While the acknowledgment is up, any key closes it and nothing else.
    if app.completion.is_some() {
        app.completion = None;
        return Transition::Continue;
    }

    match action {
        Action::Toggle => {
            match app.session.state() {
                SessionState::Idle | SessionState::Completed => app.session.start(),
                SessionState::Active => app.session.pause(),
                SessionState::Paused => app.session.resume(),
            };
        }
        Action::Stop => {
            app.session.stop();
        }
        Action::MoveLeft => {
            if selector_enabled(app) {
                app.cursor = app.cursor.saturating_sub(1);
            }
        }
        Action::MoveRight => {
            if selector_enabled(app) {
                app.cursor = (app.cursor + 1).min(app.catalog.len() - 1);
            }
        }
        Action::Select => {
            let cursor = app.cursor;
            select(app, cursor);
        }
        Action::NumberKey(n) => {
            if let Some(index) = usize::from(*n).checked_sub(1) {
                if index < app.catalog.len() {
                    select(app, index);
                }
            }
        }
        Action::Dismiss | Action::Quit => {}
    }

    Transition::Continue
}

/// Handle one tick from the event channel.
pub fn handle_tick<S: TickSource>(app: &mut App<S>, id: TimerId) -> Transition {
    match app.session.on_timer(id) {
        TickOutcome::Completed => Transition::Effect(Effect::ShowCompletion),
        _ => Transition::Continue,
    }
}

/// Apply an effect. The only effect is showing the acknowledgment.
pub fn apply_effect<S: TickSource>(app: &mut App<S>, effect: Effect, now: Instant) {
    match effect {
        Effect::ShowCompletion => {
            app.completion = Some(Completion { shown_at: now });
        }
    }
}

/// Drop the acknowledgment once it has been up long enough.
pub fn expire_completion<S: TickSource>(app: &mut App<S>, now: Instant) {
    if app.completion.is_some_and(|c| c.expired(now)) {
        app.completion = None;
    }
}

/// The selector follows the session's mode policy: usable only while Idle.
pub fn selector_enabled<S: TickSource>(app: &App<S>) -> bool {
    app.session.state() == SessionState::Idle
}

fn select<S: TickSource>(app: &mut App<S>, index: usize) {
    let Some(mode) = app.catalog.get(index).cloned() else {
        return;
    };
    if app.session.select_mode(mode) {
        app.cursor = index;
    } else {
        debug!(index, "mode selection ignored outside idle");
    }
}

// ============================================================================
// TESTS
// ============================================================================
