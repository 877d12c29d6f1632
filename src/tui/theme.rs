//! TUI color semantics and style constants.
//!
//! Color semantics:
//! - Mode color: the breathing circle and the selected card border
//! - Yellow: paused
//! - Green: completion
//! - Dim: de-emphasized (descriptions, disabled selector)
//! - Bold: important (phase label, countdowns)

use ratatui::style::{Color, Modifier, Style};

use crate::types::ModeColor;

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

/// Completion / success: green.
pub const STYLE_SAFE: Style = Style::new().fg(Color::Green);

/// Paused: yellow.
pub const STYLE_WARNING: Style = Style::new().fg(Color::Yellow);

/// De-emphasized metadata: dark gray.
pub const STYLE_DIM: Style = Style::new().fg(Color::DarkGray);

/// Important text: bold.
pub const STYLE_IMPORTANT: Style = Style::new().add_modifier(Modifier::BOLD);

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Title bar / header.
pub const STYLE_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Focused selector card title.
pub const STYLE_CURSOR: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

// ============================================================================
// MODE COLORS
// ============================================================================

/// Terminal color for a mode's display color.
pub fn mode_color(color: ModeColor) -> Color {
    let [r, g, b] = color.0;
    Color::Rgb(r, g, b)
}

/// Border style of a selector card.
pub fn card_border(color: ModeColor, selected: bool, enabled: bool) -> Style {
    match (selected, enabled) {
        (true, _) => Style::new().fg(mode_color(color)).add_modifier(Modifier::BOLD),
        (false, true) => Style::new().fg(Color::Gray),
        (false, false) => STYLE_DIM,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_styles_have_expected_colors() {
        assert_eq!(STYLE_SAFE.fg, Some(Color::Green));
        assert_eq!(STYLE_WARNING.fg, Some(Color::Yellow));
        assert_eq!(STYLE_DIM.fg, Some(Color::DarkGray));
    }

    #[test]
    fn mode_color_maps_to_rgb() {
        assert_eq!(mode_color(ModeColor([0x4a, 0x90, 0xe2])), Color::Rgb(0x4a, 0x90, 0xe2));
    }

    #[test]
    fn selected_card_uses_mode_color_even_when_disabled() {
        let color = ModeColor([1, 2, 3]);
        assert_eq!(card_border(color, true, false).fg, Some(Color::Rgb(1, 2, 3)));
        assert_eq!(card_border(color, false, false), STYLE_DIM);
        assert!(card_border(color, true, true).add_modifier.contains(Modifier::BOLD));
    }
}
