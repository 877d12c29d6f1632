//! Breathing session controller.
//!
//! Owns one session: lifecycle state, the current phase, and both
//! countdowns. The fields are private; the only way to change them is
//! through the commands below. Commands that are out of policy for the
//! current state are silent no-ops and return `false`.
//!
//! Timer rule: a tick source is armed on every entry into Active and its
//! guard is dropped on every exit from Active. The previous guard is
//! always dropped before a new one is armed.

use tracing::{debug, info};

use crate::ticker::{TickSource, TimerGuard, TimerId};
use crate::types::{Mode, Phase, SessionState, Snapshot};

/// What a single tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session was not Active (or the tick was stale). Nothing changed.
    Ignored,
    /// Both counters went down by one.
    Advanced,
    /// The phase expired and the session moved on to this phase.
    PhaseChanged(Phase),
    /// Total time ran out. Returned exactly once per session.
    Completed,
}

/// The session controller.
pub struct Session<S: TickSource> {
    state: SessionState,
    mode: Mode,
    phase: Phase,
    phase_remaining: u32,
    total_remaining: u32,
    session_secs: u32,
    source: S,
    timer: Option<S::Guard>,
}

impl<S: TickSource> Session<S> {
    /// New Idle session. A zero session length is raised to one second.
    pub fn new(mode: Mode, session_secs: u32, source: S) -> Self {
        let session_secs = session_secs.max(1);
        Session {
            state: SessionState::Idle,
            phase: Phase::Inhale,
            phase_remaining: mode.inhale,
            total_remaining: session_secs,
            session_secs,
            mode,
            source,
            timer: None,
        }
    }

    // ========================================================================
    // READ ACCESS
    // ========================================================================

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state,
            phase: self.phase,
            phase_remaining: self.phase_remaining,
            total_remaining: self.total_remaining,
            session_secs: self.session_secs,
            mode: &self.mode,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Id of the live timer, if one is armed.
    pub fn timer_id(&self) -> Option<TimerId> {
        self.timer.as_ref().map(TimerGuard::id)
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// Replace the mode. Only allowed while Idle.
    pub fn select_mode(&mut self, mode: Mode) -> bool {
        if self.state != SessionState::Idle {
            debug!(state = ?self.state, mode = %mode.id, "mode change rejected");
            return false;
        }
        info!(mode = %mode.id, "mode selected");
        self.mode = mode;
        self.reset();
        true
    }

    /// Begin a fresh session from any state but Active.
    pub fn start(&mut self) -> bool {
        if self.state == SessionState::Active {
            return false;
        }
        self.state = SessionState::Active;
        self.phase = Phase::Inhale;
        self.phase_remaining = self.mode.inhale;
        self.total_remaining = self.session_secs;
        self.arm();
        info!(mode = %self.mode.id, secs = self.session_secs, "session started");
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        self.state = SessionState::Paused;
        self.disarm();
        info!(
            phase = ?self.phase,
            phase_remaining = self.phase_remaining,
            total_remaining = self.total_remaining,
            "session paused"
        );
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        self.state = SessionState::Active;
        self.arm();
        info!(total_remaining = self.total_remaining, "session resumed");
        true
    }

    /// Reset to Idle from any state. A second stop changes nothing.
    pub fn stop(&mut self) -> bool {
        if self.state == SessionState::Idle {
            return false;
        }
        self.reset();
        info!("session stopped");
        true
    }

    /// Advance the session by one second.
    ///
    /// The tick that would take the phase counter to zero moves to the next
    /// phase and loads its full duration instead. The total counter is
    /// updated in the same tick; reaching zero completes the session.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != SessionState::Active {
            return TickOutcome::Ignored;
        }

        let mut outcome = TickOutcome::Advanced;

        if self.phase_remaining <= 1 {
            self.phase = self.phase.next();
            self.phase_remaining = self.mode.duration(self.phase);
            debug!(phase = ?self.phase, secs = self.phase_remaining, "phase changed");
            outcome = TickOutcome::PhaseChanged(self.phase);
        } else {
            self.phase_remaining -= 1;
        }

        if self.total_remaining <= 1 {
            self.total_remaining = 0;
            self.state = SessionState::Completed;
            self.disarm();
            info!(mode = %self.mode.id, secs = self.session_secs, "session completed");
            return TickOutcome::Completed;
        }
        self.total_remaining -= 1;

        outcome
    }

    /// Deliver a tick from the tick source. Ticks from a guard that has
    /// already been dropped are ignored.
    pub fn on_timer(&mut self, id: TimerId) -> TickOutcome {
        if self.timer_id() != Some(id) {
            debug!(timer = id.0, "stale tick ignored");
            return TickOutcome::Ignored;
        }
        self.tick()
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn reset(&mut self) {
        self.disarm();
        self.state = SessionState::Idle;
        self.phase = Phase::Inhale;
        self.phase_remaining = self.mode.inhale;
        self.total_remaining = self.session_secs;
    }

    fn arm(&mut self) {
        self.disarm();
        self.timer = Some(self.source.arm());
    }

    fn disarm(&mut self) {
        self.timer = None;
    }
}

// ============================================================================
// TESTS
// ============================================================================
