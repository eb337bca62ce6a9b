//! Full-screen TUI for graphping.

pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
use graphping_core::config::Config;
pub use runtime::TuiRuntime;

/// Runs the interactive probe.
pub async fn run_interactive(config: Config) -> Result<()> {
    // The probe renders a full-screen form; it needs a real terminal.
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive probe requires a terminal.\n\
             Use `graphping check` for non-interactive probing."
        );
    }

    let runtime = TuiRuntime::new(config)?;
    runtime.run().await
}
