//! Interactive probe (default mode).

use anyhow::{Context, Result};
use graphping_core::config::Config;

pub async fn run(config: Config) -> Result<()> {
    // The TUI owns the screen; logs go to a file.
    let _guard = graphping_core::logging::init_tui().context("initialize logging")?;
    graphping_tui::run_interactive(config).await
}
