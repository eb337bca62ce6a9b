//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer only mutates state; dialing, teardown, and quitting happen
//! in the runtime.

use graphping_core::client::{Credentials, Query};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, PartialEq, Eq)]
pub enum UiEffect {
    /// Start a session with a snapshot of the form.
    Connect {
        credentials: Credentials,
        query: Query,
    },

    /// Tear the current session down.
    Disconnect,

    /// Quit the application (the runtime tears the session down first).
    Quit,
}
