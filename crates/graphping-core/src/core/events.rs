//! Probe event types for the UI and headless observers.
//!
//! Events are the only channel between the session core and the operator
//! surface. They are serializable for a future JSON output mode.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::RecordSummary;

/// Events emitted by the session controller and polling loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbeEvent {
    /// A connection is live and the polling loop is running.
    Connected { endpoint: String },

    /// The operator tore the session down; the toggle is back to idle.
    Disconnected,

    /// One poll tick ran the query successfully.
    ///
    /// Observability only — no state change follows from this event.
    PollSucceeded { summary: RecordSummary },

    /// A session failure.
    ///
    /// `Dial` and `Query` failures are terminal: the session is torn down
    /// and the toggle returns to idle. `Teardown` failures are surfaced
    /// while local state is already cleared.
    Error {
        kind: ErrorKind,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl ProbeEvent {
    /// True for events that leave the system idle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProbeEvent::Disconnected
                | ProbeEvent::Error {
                    kind: ErrorKind::Dial | ErrorKind::Query,
                    ..
                }
        )
    }
}

/// Error categories for `ProbeEvent::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The dial itself failed; no polling loop was started.
    Dial,
    /// A poll's query failed; fatal to the session.
    Query,
    /// Closing the connection failed during teardown; local state is
    /// cleared regardless.
    Teardown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Dial => write!(f, "dial"),
            ErrorKind::Query => write!(f, "query"),
            ErrorKind::Teardown => write!(f, "teardown"),
        }
    }
}
