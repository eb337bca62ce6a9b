//! Graph database client capability.
//!
//! The probe consumes the database through this seam: dial a connection,
//! open a short-lived session per query, run one read-only query, close.
//! The wire protocol behind the seam is not ours — `http` implements it
//! over the Neo4j HTTP API, and tests substitute scripted mocks.

mod http;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
pub use http::HttpGraphClient;
use serde::{Deserialize, Serialize};

/// Connection parameters captured when the operator triggers a connect.
///
/// This is a snapshot: edits to the form after the trigger never reach an
/// in-flight connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

/// The read-only query a session reissues on every tick.
///
/// Fixed for the lifetime of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summary of one successful poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Number of records the query returned.
    pub records: usize,
    /// Round-trip time of the query in milliseconds.
    pub latency_ms: u64,
}

/// Error produced by the client capability.
///
/// The session layer decides whether it counts as a dial, query, or
/// teardown failure; the client only carries what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    pub message: String,
    pub details: Option<String>,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({details})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ClientError {}

/// Dials connections for the probe.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Opens a connection to the endpoint named in `credentials`.
    async fn connect(&self, credentials: &Credentials)
    -> Result<Arc<dyn GraphConnection>, ClientError>;
}

/// An open connection to a graph database endpoint.
#[async_trait]
pub trait GraphConnection: Send + Sync {
    /// Opens a short-lived session for running one query.
    fn session(&self) -> Box<dyn GraphSession>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), ClientError>;
}

/// A short-lived handle used to run one query against an open connection.
#[async_trait]
pub trait GraphSession: Send {
    /// Runs a single read-only query and returns a summary of the result.
    async fn read_only_query(&mut self, text: &str) -> Result<RecordSummary, ClientError>;

    /// Closes the session.
    async fn close(self: Box<Self>) -> Result<(), ClientError>;
}
