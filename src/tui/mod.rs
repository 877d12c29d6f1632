//! Interactive terminal interface.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: app model, events, actions, transitions
//! - `update`: actions and ticks applied to the app
//! - `view`: pure rendering
//! - `theme`: styles
//! - `run`: effects (terminal, threads, event loop)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use run::run;
