//! Domain types for serene-flow.
//!
//! Modes are immutable configuration records. Session state lives in
//! [`crate::session::Session`]; the types here are what it exposes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Display color of a mode, stored as an RGB triple.
///
/// Parsed from and serialized to `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeColor(pub [u8; 3]);

impl ModeColor {
    /// Returns the color as a lowercase `#rrggbb` string.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.0;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl fmt::Display for ModeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ModeColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("Expected '#rrggbb', got {:?}", s))?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("Expected 6 hex digits, got {:?}", hex));
        }
        let mut rgb = [0u8; 3];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).map_err(|e| e.to_string())?;
            rgb[i] = u8::from_str_radix(pair, 16).map_err(|e| e.to_string())?;
        }
        Ok(ModeColor(rgb))
    }
}

impl Serialize for ModeColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ModeColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// ENUMS
// ============================================================================

/// Sub-step of one breath cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    /// The phase that follows this one. The cycle has no branches.
    pub fn next(self) -> Phase {
        match self {
            Phase::Inhale => Phase::Hold,
            Phase::Hold => Phase::Exhale,
            Phase::Exhale => Phase::Inhale,
        }
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No countdown; counters hold their initial values.
    Idle,
    /// Counting down, one tick per second.
    Active,
    /// Counters frozen until resume.
    Paused,
    /// Total time exhausted. Terminal until stop or start.
    Completed,
}

// ============================================================================
// STRUCTS
// ============================================================================

/// A named breathing pattern.
///
/// Supplied by the catalog and never mutated. Durations are whole seconds
/// and must all be positive (enforced by [`crate::catalog::Catalog`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    /// Unique identifier within a catalog.
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-line description shown in the selector.
    pub description: String,
    /// Display color.
    pub color: ModeColor,
    /// Inhale duration in seconds.
    pub inhale: u32,
    /// Hold duration in seconds.
    pub hold: u32,
    /// Exhale duration in seconds.
    pub exhale: u32,
}

impl Mode {
    /// Configured duration of `phase` in seconds.
    pub fn duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.inhale,
            Phase::Hold => self.hold,
            Phase::Exhale => self.exhale,
        }
    }

    /// Length of one full breath cycle in seconds.
    pub fn cycle_secs(&self) -> u32 {
        self.inhale.saturating_add(self.hold).saturating_add(self.exhale)
    }
}

/// Read-only view of a session, handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub state: SessionState,
    pub phase: Phase,
    /// Seconds left in the current phase.
    pub phase_remaining: u32,
    /// Seconds left in the whole session.
    pub total_remaining: u32,
    /// Configured session length in seconds.
    pub session_secs: u32,
    pub mode: &'a Mode,
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable pretty output.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn zen() -> Mode {
        Mode {
            id: "zen".into(),
            name: "Zen".into(),
            description: String::new(),
            color: ModeColor([0x4a, 0x90, 0xe2]),
            inhale: 4,
            hold: 7,
            exhale: 8,
        }
    }

    #[test]
    fn phase_cycle_wraps_after_exhale() {
        assert_eq!(Phase::Inhale.next(), Phase::Hold);
        assert_eq!(Phase::Hold.next(), Phase::Exhale);
        assert_eq!(Phase::Exhale.next(), Phase::Inhale);
    }

    #[test]
    fn mode_duration_per_phase() {
        let mode = zen();
        assert_eq!(mode.duration(Phase::Inhale), 4);
        assert_eq!(mode.duration(Phase::Hold), 7);
        assert_eq!(mode.duration(Phase::Exhale), 8);
        assert_eq!(mode.cycle_secs(), 19);
    }

    #[test]
    fn color_parses_mixed_case_hex() {
        let color: ModeColor = "#4A90e2".parse().unwrap();
        assert_eq!(color, ModeColor([0x4a, 0x90, 0xe2]));
        assert_eq!(color.to_hex(), "#4a90e2");
    }

    #[test]
    fn color_rejects_missing_hash_and_bad_digits() {
        assert!("4A90E2".parse::<ModeColor>().is_err());
        assert!("#4A90E".parse::<ModeColor>().is_err());
        assert!("#GG90E2".parse::<ModeColor>().is_err());
        assert!("#+1+2+3".parse::<ModeColor>().is_err());
        assert!("#+f+f+f".parse::<ModeColor>().is_err());
    }

    #[test]
    fn cycle_length_saturates_on_huge_durations() {
        let mode = Mode {
            inhale: u32::MAX,
            ..zen()
        };
        assert_eq!(mode.cycle_secs(), u32::MAX);
    }

    #[test]
    fn mode_json_uses_hex_color_and_plain_fields() {
        let json = serde_json::to_value(zen()).unwrap();
        assert_eq!(json["color"], "#4a90e2");
        assert_eq!(json["hold"], 7);

        let back: Mode = serde_json::from_value(json).unwrap();
        assert_eq!(back, zen());
    }

    #[test]
    fn session_state_serializes_lowercase() {
        let json = serde_json::to_string(&SessionState::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
