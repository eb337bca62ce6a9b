//! UI event types.
//!
//! All external inputs (terminal, session core) are converted to `UiEvent`
//! before being processed by the reducer.

use crossterm::event::Event as CrosstermEvent;
use graphping_core::core::events::ProbeEvent;

/// Unified event enum for the TUI.
#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (render pacing).
    Tick,

    /// Terminal input event (key, resize).
    Terminal(CrosstermEvent),

    /// Session core event (connect/disconnect/poll outcomes).
    Probe(ProbeEvent),
}
