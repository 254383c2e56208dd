//! Interactive client for the nextcomp CLI.
//!
//! The client:
//! - Renders the component form in the terminal
//! - Validates on submit and shows the generated command in a popup
//! - Copies the command to the clipboard on request
//! - Hands the accepted command back for printing to stdout

pub mod tui;

pub use tui::run_tui;
