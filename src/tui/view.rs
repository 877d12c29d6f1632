//! Pure rendering: map App state to ratatui widget trees.
//!
//! Everything shown is derived from the session snapshot plus the app's
//! selector and overlay state. The circle's scale is computed here, not
//! stored anywhere.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::report::{format_clock, format_pattern, phase_label};
use crate::ticker::TickSource;
use crate::types::{Phase, SessionState, Snapshot};

use super::state::App;
use super::theme;
use super::update::selector_enabled;

/// Circle scale at rest (exhaled).
pub const SCALE_MIN: f64 = 1.0;

/// Circle scale when the lungs are full.
pub const SCALE_MAX: f64 = 1.4;

// ============================================================================
// DERIVED VALUES
// ============================================================================

/// Circle scale for a snapshot.
///
/// Grows over Inhale, stays full over Hold, shrinks over Exhale. Each
/// value is where the animation lands at the end of the current second.
pub fn breath_scale(snap: &Snapshot<'_>) -> f64 {
    match snap.state {
        SessionState::Idle | SessionState::Completed => SCALE_MIN,
        SessionState::Active | SessionState::Paused => {
            let duration = snap.mode.duration(snap.phase).max(1);
            let elapsed = duration.saturating_sub(snap.phase_remaining) + 1;
            let progress = (f64::from(elapsed) / f64::from(duration)).clamp(0.0, 1.0);
            match snap.phase {
                Phase::Inhale => SCALE_MIN + (SCALE_MAX - SCALE_MIN) * progress,
                Phase::Hold => SCALE_MAX,
                Phase::Exhale => SCALE_MAX - (SCALE_MAX - SCALE_MIN) * progress,
            }
        }
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the whole screen to the terminal frame.
pub fn render<S: TickSource>(app: &App<S>, frame: &mut Frame) {
    let area = frame.area();
    let snap = app.session.snapshot();

    let chunks = Layout::vertical([
        Constraint::Length(2), // title + tagline
        Constraint::Length(2), // practice heading + clock
        Constraint::Min(5),    // circle
        Constraint::Length(2), // phase label + countdown
        Constraint::Length(7), // mode selector
        Constraint::Length(1), // help
    ])
    .split(area);

    frame.render_widget(render_title(), chunks[0]);
    frame.render_widget(render_heading(&snap), chunks[1]);
    render_circle(&snap, frame, chunks[2]);
    frame.render_widget(render_phase(&snap), chunks[3]);
    render_selector(app, frame, chunks[4]);
    frame.render_widget(render_help(snap.state), chunks[5]);

    if app.completion.is_some() {
        render_completion(frame, area);
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

fn render_title() -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled("Serene Flow", theme::STYLE_TITLE)),
        Line::from(Span::styled(
            "Find your calm through guided breathing",
            theme::STYLE_DIM,
        )),
    ])
    .alignment(Alignment::Center)
}

/// Help line showing available keybindings for the session state.
fn render_help(state: SessionState) -> Paragraph<'static> {
    let help_text = match state {
        SessionState::Idle => "[Space] start  [←/→] choose  [Enter/1-9] select mode  [q] quit",
        SessionState::Active => "[Space] pause  [s] stop  [q] quit",
        SessionState::Paused => "[Space] resume  [s] stop  [q] quit",
        SessionState::Completed => "[Space] again  [s] reset  [q] quit",
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_HELP)).alignment(Alignment::Center)
}

// ============================================================================
// SESSION
// ============================================================================

fn render_heading<'a>(snap: &Snapshot<'a>) -> Paragraph<'a> {
    let status = match snap.state {
        SessionState::Idle => Span::styled("Ready to begin", theme::STYLE_DIM),
        SessionState::Active => Span::raw(format_clock(snap.total_remaining)),
        SessionState::Paused => Span::styled(
            format!("{}  paused", format_clock(snap.total_remaining)),
            theme::STYLE_WARNING,
        ),
        SessionState::Completed => Span::styled(format_clock(0), theme::STYLE_SAFE),
    };

    Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} Practice", snap.mode.name),
            theme::STYLE_IMPORTANT,
        )),
        Line::from(status),
    ])
    .alignment(Alignment::Center)
}

fn render_circle(snap: &Snapshot<'_>, frame: &mut Frame, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    // Terminal cells are about twice as tall as wide.
    let half_width = f64::from(area.width) / (f64::from(area.height) * 2.0);
    let radius = 0.95 * breath_scale(snap) / SCALE_MAX;
    let color = theme::mode_color(snap.mode.color);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-half_width, half_width])
        .y_bounds([-1.0, 1.0])
        .paint(move |ctx| {
            // Concentric rings read as a filled disc.
            let mut r = radius;
            while r > 0.0 {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: r,
                    color,
                });
                r -= 0.08;
            }
        });

    frame.render_widget(canvas, area);
}

fn render_phase(snap: &Snapshot<'_>) -> Paragraph<'static> {
    let lines = match snap.state {
        SessionState::Idle => vec![Line::from(Span::styled("Ready", theme::STYLE_IMPORTANT))],
        SessionState::Completed => vec![Line::from(Span::styled(
            "Session complete",
            theme::STYLE_SAFE,
        ))],
        SessionState::Active | SessionState::Paused => vec![
            Line::from(Span::styled(phase_label(snap.phase), theme::STYLE_IMPORTANT)),
            Line::from(Span::styled(
                snap.phase_remaining.to_string(),
                theme::STYLE_IMPORTANT,
            )),
        ],
    };

    Paragraph::new(lines).alignment(Alignment::Center)
}

// ============================================================================
// MODE SELECTOR
// ============================================================================

fn render_selector<S: TickSource>(app: &App<S>, frame: &mut Frame, area: Rect) {
    let modes = app.catalog.modes();
    let enabled = selector_enabled(app);
    let selected = app.selected_index();

    let constraints: Vec<Constraint> = modes
        .iter()
        .map(|_| Constraint::Ratio(1, modes.len() as u32))
        .collect();
    let cards = Layout::horizontal(constraints).split(area);

    for (i, (mode, card)) in modes.iter().zip(cards.iter()).enumerate() {
        let is_selected = selected == Some(i);
        let is_cursor = enabled && i == app.cursor;

        let title_style = if is_cursor {
            theme::STYLE_CURSOR
        } else if enabled {
            theme::STYLE_IMPORTANT
        } else {
            theme::STYLE_DIM
        };
        let body_style = if enabled { theme::STYLE_DIM } else { theme::STYLE_HELP };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::card_border(mode.color, is_selected, enabled))
            .title(Span::styled(format!(" {} {} ", i + 1, mode.name), title_style));

        let body = Paragraph::new(vec![
            Line::from(Span::styled(format_pattern(mode), body_style)),
            Line::from(Span::styled(mode.description.as_str(), body_style)),
        ])
        .wrap(Wrap { trim: true })
        .block(block);

        frame.render_widget(body, *card);
    }
}

// ============================================================================
// COMPLETION
// ============================================================================

fn render_completion(frame: &mut Frame, area: Rect) {
    let popup = centered(area, 56, 7);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("✦  Peace Achieved  ✦", theme::STYLE_SAFE)),
        Line::from(""),
        Line::from("Well done. You've completed your meditation session."),
    ];

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::STYLE_SAFE),
        );

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ticker::ManualTicker;
    use crate::tui::state::{Action, Completion};
    use crate::tui::update::update;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Instant;

    fn make_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 30);
        Terminal::new(backend).unwrap()
    }

    fn app() -> App<ManualTicker> {
        App::new(Catalog::builtin(), 0, 120, ManualTicker::default())
    }

    fn screen_text(app: &App<ManualTicker>) -> String {
        let mut terminal = make_terminal();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    fn tick(app: &mut App<ManualTicker>, n: u32) {
        for _ in 0..n {
            app.session.tick();
        }
    }

    // -- Scale --

    #[test]
    fn scale_rests_when_idle() {
        let app = app();
        assert_eq!(breath_scale(&app.session.snapshot()), SCALE_MIN);
    }

    #[test]
    fn scale_grows_over_inhale_and_holds() {
        let mut app = app();
        app.session.start();
        let first = breath_scale(&app.session.snapshot());
        tick(&mut app, 2);
        let later = breath_scale(&app.session.snapshot());
        assert!(first < later);
        assert!((first - 1.1).abs() < 1e-9);

        tick(&mut app, 2); // now in Hold
        assert_eq!(breath_scale(&app.session.snapshot()), SCALE_MAX);
    }

    #[test]
    fn scale_shrinks_to_rest_over_exhale() {
        let mut app = app();
        app.session.start();
        tick(&mut app, 4 + 7); // Exhale, 8 left
        let start = breath_scale(&app.session.snapshot());
        tick(&mut app, 7); // Exhale, 1 left
        let end = breath_scale(&app.session.snapshot());
        assert!(start > end);
        assert!((end - SCALE_MIN).abs() < 1e-9);
    }

    // -- Screens --

    #[test]
    fn idle_screen_shows_ready_and_modes() {
        let text = screen_text(&app());
        assert!(text.contains("Serene Flow"));
        assert!(text.contains("Zen Practice"));
        assert!(text.contains("Ready to begin"));
        assert!(text.contains("Focused"));
        assert!(text.contains("4s / 7s / 8s"));
    }

    #[test]
    fn active_screen_shows_clock_and_phase() {
        let mut app = app();
        update(&mut app, &Action::Toggle);
        tick(&mut app, 5);
        let text = screen_text(&app);
        assert!(text.contains("01:55"), "clock");
        assert!(text.contains("Hold"), "phase label");
        assert!(text.contains("[Space] pause"), "help");
    }

    #[test]
    fn paused_screen_says_paused() {
        let mut app = app();
        update(&mut app, &Action::Toggle);
        update(&mut app, &Action::Toggle);
        let text = screen_text(&app);
        assert!(text.contains("paused"));
        assert!(text.contains("Breathe In"));
    }

    #[test]
    fn completion_overlay_renders() {
        let mut app = App::new(Catalog::builtin(), 2, 2, ManualTicker::default());
        update(&mut app, &Action::Toggle);
        tick(&mut app, 2);
        app.completion = Some(Completion { shown_at: Instant::now() });
        let text = screen_text(&app);
        assert!(text.contains("Peace Achieved"));
    }

    #[test]
    fn all_states_render_without_panic() {
        let mut app = app();
        let mut terminal = make_terminal();
        for action in [Action::Toggle, Action::Toggle, Action::Toggle, Action::Stop] {
            update(&mut app, &action);
            terminal
                .draw(|frame| render(&app, frame))
                .expect("every state should render without panic");
        }
    }

    #[test]
    fn tiny_terminal_renders_without_panic() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal
            .draw(|frame| render(&app, frame))
            .expect("render should not panic");
    }

    #[test]
    fn centered_rect_is_clipped() {
        let area = Rect::new(0, 0, 20, 5);
        let r = centered(area, 56, 7);
        assert_eq!((r.width, r.height), (20, 5));
        let r = centered(Rect::new(0, 0, 100, 40), 56, 7);
        assert_eq!((r.x, r.y), (22, 16));
    }
}
