//! serene-flow CLI
//!
//! Guided breathing sessions in the terminal.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use serene_flow::catalog::{Catalog, DEFAULT_SESSION_SECS};
use serene_flow::error::Result;
use serene_flow::logging;
use serene_flow::report::{format_catalog, format_clock, format_pattern, format_status, phase_label};
use serene_flow::session::{Session, TickOutcome};
use serene_flow::ticker::{ThreadTicker, TickSource, TimerId};
use serene_flow::tui;
use serene_flow::types::{OutputFormat, Phase};

#[derive(Parser)]
#[command(name = "serene-flow")]
#[command(about = "Guided breathing timer")]
#[command(version)]
struct Cli {
    /// Mode catalog JSON file (default: config dir, else built-in modes)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Session length in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_SESSION_SECS,
          value_parser = clap::value_parser!(u32).range(1..))]
    duration: u32,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Tui {
        /// Mode id to preselect
        #[arg(long)]
        mode: Option<String>,
    },

    /// Plain-terminal session with a progress bar
    Run {
        /// Mode id (default: first in catalog)
        #[arg(long)]
        mode: Option<String>,
    },

    /// List available breathing modes
    Modes {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is best-effort: a read-only data dir must not block a session.
    if let Err(e) = logging::init() {
        eprintln!("Note: logging disabled ({})", e);
    }

    let result = Catalog::load_or_builtin(cli.catalog.as_deref()).and_then(|catalog| {
        match cli.command.unwrap_or(Commands::Tui { mode: None }) {
            Commands::Tui { mode } => cmd_tui(catalog, mode, cli.duration),
            Commands::Run { mode } => cmd_run(catalog, mode, cli.duration),
            Commands::Modes { format } => cmd_modes(&catalog, format.into()),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// MODE RESOLUTION
// ============================================================================

/// Catalog index for an optional `--mode` id; first mode when absent.
fn resolve_mode(catalog: &Catalog, mode: Option<&str>) -> Result<usize> {
    match mode {
        None => Ok(0),
        Some(id) => catalog.require(id),
    }
}

// ============================================================================
// PROGRESS HELPERS
// ============================================================================

fn session_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_tui(catalog: Catalog, mode: Option<String>, duration: u32) -> Result<()> {
    let index = resolve_mode(&catalog, mode.as_deref())?;
    tui::run(catalog, index, duration)
}

fn cmd_run(catalog: Catalog, mode: Option<String>, duration: u32) -> Result<()> {
    let index = resolve_mode(&catalog, mode.as_deref())?;
    let mode = catalog.modes()[index].clone();

    println!("{} Practice  ({})", mode.name, format_pattern(&mode));
    println!("{}", mode.description);
    println!();

    let (tx, rx) = mpsc::channel::<TimerId>();
    let mut session = Session::new(mode, duration, ThreadTicker::new(tx, |id| id));
    session.start();

    let pb = session_bar(u64::from(duration));
    drive(&mut session, &rx, &pb);
    println!();
    println!(
        "Well done. You've completed {} of {} breathing.",
        format_clock(duration),
        session.mode().name
    );

    Ok(())
}

/// Feed ticks from `rx` into a started session until it completes.
///
/// Phase names are printed above the bar as they begin. Returns the
/// phases in the order they were entered.
fn drive<S: TickSource>(
    session: &mut Session<S>,
    rx: &Receiver<TimerId>,
    pb: &ProgressBar,
) -> Vec<Phase> {
    let total = u64::from(session.snapshot().session_secs);
    let first = session.snapshot().phase;
    let mut phases = vec![first];
    pb.println(phase_label(first));
    pb.set_message(format_status(&session.snapshot()));

    // The session holds the only sender in use; the loop ends on completion.
    while let Ok(id) = rx.recv() {
        match session.on_timer(id) {
            TickOutcome::Ignored => continue,
            TickOutcome::Advanced => {}
            TickOutcome::PhaseChanged(phase) => {
                phases.push(phase);
                pb.println(phase_label(phase));
            }
            TickOutcome::Completed => {
                pb.set_position(total);
                pb.finish_with_message(format_status(&session.snapshot()));
                break;
            }
        }
        let snap = session.snapshot();
        pb.set_position(total - u64::from(snap.total_remaining));
        pb.set_message(format_status(&snap));
    }

    // Leaves the bar in place if the channel closed before completion.
    if !pb.is_finished() {
        pb.abandon();
    }
    phases
}

fn cmd_modes(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    print!("{}", format_catalog(catalog, format));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serene_flow::types::SessionState;
    use std::time::Duration;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn duration_defaults_to_reference_session() {
        let cli = Cli::parse_from(["serene-flow"]);
        assert_eq!(cli.duration, 120);
        assert!(cli.command.is_none());
    }

    #[test]
    fn zero_duration_rejected() {
        assert!(Cli::try_parse_from(["serene-flow", "--duration", "0"]).is_err());
    }

    #[test]
    fn resolve_mode_by_id() {
        let catalog = Catalog::builtin();
        assert_eq!(resolve_mode(&catalog, None).unwrap(), 0);
        assert_eq!(resolve_mode(&catalog, Some("energize")).unwrap(), 2);
        assert!(resolve_mode(&catalog, Some("calm")).is_err());
    }

    #[test]
    fn resolve_unknown_mode_lists_known_ids() {
        let err = resolve_mode(&Catalog::builtin(), Some("calm")).unwrap_err();
        assert!(err.to_string().contains("zen, focused, energize"));
    }

    #[test]
    fn drive_runs_session_to_completion() {
        let catalog = Catalog::builtin();
        let energize = catalog.find("energize").unwrap().clone();
        let (tx, rx) = mpsc::channel::<TimerId>();
        let ticker = ThreadTicker::with_period(tx, |id| id, Duration::from_millis(1));
        let mut session = Session::new(energize, 5, ticker);
        session.start();

        let pb = ProgressBar::hidden();
        let phases = drive(&mut session, &rx, &pb);

        assert_eq!(phases, vec![Phase::Inhale, Phase::Hold, Phase::Exhale]);
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.snapshot().total_remaining, 0);
        assert!(pb.is_finished());
        assert_eq!(pb.position(), 5);
    }
}
