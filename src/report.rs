//! Text formatting shared by the TUI, the plain runner and `modes`.
//!
//! Pure functions: data in, String out.

use crate::catalog::Catalog;
use crate::types::{Mode, OutputFormat, Phase, SessionState, Snapshot};

/// Format seconds as a zero-padded `mm:ss` clock.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Instruction shown for a phase.
pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Inhale => "Breathe In",
        Phase::Hold => "Hold",
        Phase::Exhale => "Breathe Out",
    }
}

/// `4s / 7s / 8s`
pub fn format_pattern(mode: &Mode) -> String {
    format!("{}s / {}s / {}s", mode.inhale, mode.hold, mode.exhale)
}

/// One-line status for the plain runner.
pub fn format_status(snap: &Snapshot<'_>) -> String {
    match snap.state {
        SessionState::Idle => format!("{} Practice  Ready to begin", snap.mode.name),
        SessionState::Completed => "Peace Achieved".to_string(),
        SessionState::Active | SessionState::Paused => format!(
            "{:<12} {:>2}s   {} left",
            phase_label(snap.phase),
            snap.phase_remaining,
            format_clock(snap.total_remaining)
        ),
    }
}

/// Format the mode catalog for `serene-flow modes`.
pub fn format_catalog(catalog: &Catalog, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(catalog),
        OutputFormat::Json => format_json(catalog),
    }
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_human(catalog: &Catalog) -> String {
    let mut out = String::new();

    out.push_str("=== Breathing Modes ===\n");
    for (i, mode) in catalog.modes().iter().enumerate() {
        out.push_str(&format!(
            "[{}] {:<10} {:<14} {}  ({})\n",
            i + 1,
            mode.id,
            format_pattern(mode),
            mode.color,
            mode.name
        ));
        if !mode.description.is_empty() {
            out.push_str(&format!("    {}\n", mode.description));
        }
    }

    out
}

// ============================================================================
// JSON FORMAT
// ============================================================================

fn format_json(catalog: &Catalog) -> String {
    serde_json::to_string_pretty(catalog.modes()).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize catalog: {}\"}}", e)
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_modes;

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(120), "02:00");
        assert_eq!(format_clock(754), "12:34");
    }

    #[test]
    fn phase_labels() {
        assert_eq!(phase_label(Phase::Inhale), "Breathe In");
        assert_eq!(phase_label(Phase::Hold), "Hold");
        assert_eq!(phase_label(Phase::Exhale), "Breathe Out");
    }

    #[test]
    fn pattern_lists_all_three_durations() {
        let zen = &builtin_modes()[0];
        assert_eq!(format_pattern(zen), "4s / 7s / 8s");
    }

    #[test]
    fn status_line_per_state() {
        let zen = &builtin_modes()[0];
        let mut snap = Snapshot {
            state: SessionState::Idle,
            phase: Phase::Inhale,
            phase_remaining: 4,
            total_remaining: 120,
            session_secs: 120,
            mode: zen,
        };
        assert!(format_status(&snap).contains("Ready to begin"));

        snap.state = SessionState::Active;
        snap.phase = Phase::Hold;
        snap.phase_remaining = 7;
        snap.total_remaining = 75;
        let line = format_status(&snap);
        assert!(line.contains("Hold"));
        assert!(line.contains("7s"));
        assert!(line.contains("01:15"));

        snap.state = SessionState::Completed;
        assert_eq!(format_status(&snap), "Peace Achieved");
    }

    #[test]
    fn human_catalog_lists_every_mode() {
        let out = format_catalog(&Catalog::builtin(), OutputFormat::Human);
        assert!(out.contains("zen"));
        assert!(out.contains("4s / 4s / 4s"));
        assert!(out.contains("#ff6b6b"));
        assert!(out.contains("Quick breathing"));
    }

    #[test]
    fn json_catalog_round_trips_through_serde() {
        let out = format_catalog(&Catalog::builtin(), OutputFormat::Json);
        let modes: Vec<Mode> = serde_json::from_str(&out).unwrap();
        assert_eq!(modes, builtin_modes());
    }
}
