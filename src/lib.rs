//! serene-flow: guided breathing timer for the terminal.

pub mod catalog;
pub mod error;
pub mod logging;
pub mod report;
pub mod session;
pub mod ticker;
pub mod tui;
pub mod types;
