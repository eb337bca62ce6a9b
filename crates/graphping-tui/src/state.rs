//! Application state for the probe TUI.
//!
//! State is mutated only by the reducer in `update.rs`. The session core's
//! real state (connection, timer) lives behind the session worker; the TUI
//! tracks the operator-facing toggle and the result log.

use chrono::{DateTime, Local};
use graphping_core::config::Config;

/// Cap on retained log entries; older ones are dropped from the front.
const MAX_LOG_ENTRIES: usize = 500;

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Endpoint,
    Username,
    Password,
    Query,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Endpoint, Field::Username, Field::Password, Field::Query];

    pub fn next(self) -> Self {
        match self {
            Field::Endpoint => Field::Username,
            Field::Username => Field::Password,
            Field::Password => Field::Query,
            Field::Query => Field::Endpoint,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::Endpoint => Field::Query,
            Field::Username => Field::Endpoint,
            Field::Password => Field::Username,
            Field::Query => Field::Password,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Endpoint => "Endpoint",
            Field::Username => "Username",
            Field::Password => "Password",
            Field::Query => "Query",
        }
    }
}

/// Connection form contents.
///
/// Edits never reach an in-flight connection: the reducer snapshots the
/// form into `Credentials` at the moment connect is triggered.
#[derive(Debug, Clone)]
pub struct FormState {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub query: String,
    pub focus: Field,
}

impl FormState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            query: config.query.clone(),
            focus: Field::Endpoint,
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Endpoint => &self.endpoint,
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::Query => &self.query,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Endpoint => &mut self.endpoint,
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
            Field::Query => &mut self.query,
        }
    }
}

/// Idle/connected toggle: one tagged state, never two booleans that could
/// disagree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Connected {
        endpoint: String,
    },
}

impl Phase {
    /// Connect is offered exactly when idle.
    pub fn connect_available(&self) -> bool {
        matches!(self, Phase::Idle)
    }

    /// Disconnect is offered exactly when connected; the two outputs are
    /// complements by construction.
    pub fn disconnect_available(&self) -> bool {
        !self.connect_available()
    }
}

/// Severity of a result log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Success,
    Error,
}

/// One line in the result log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub kind: LogKind,
    pub text: String,
}

/// TUI application state.
pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Connection form (endpoint, auth, query).
    pub form: FormState,
    /// Idle/connected toggle.
    pub phase: Phase,
    /// Poll results and lifecycle messages, newest last.
    pub log: Vec<LogEntry>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            form: FormState::from_config(config),
            phase: Phase::Idle,
            log: Vec::new(),
        }
    }

    pub fn push_log(&mut self, kind: LogKind, text: impl Into<String>) {
        self.log.push(LogEntry {
            at: Local::now(),
            kind,
            text: text.into(),
        });
        if self.log.len() > MAX_LOG_ENTRIES {
            let excess = self.log.len() - MAX_LOG_ENTRIES;
            self.log.drain(..excess);
        }
    }
}
