//! The polling loop.
//!
//! One task per session: run the query, report, sleep, repeat. The armed
//! sleep is the session's pending timer and cancelling its token is the
//! only way to clear it. An in-flight query is never aborted, so
//! cancellation takes effect between ticks.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::{ClientError, GraphConnection, Query, RecordSummary};
use crate::core::events::{ErrorKind, ProbeEvent};
use crate::core::session::{self, ProbeEventTx, SharedState};

/// Poll cadence: one query per tick, a fixed second apart.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub(crate) struct PollTask {
    pub(crate) shared: SharedState,
    pub(crate) cancel: CancellationToken,
    pub(crate) epoch: u64,
    pub(crate) query: Query,
    pub(crate) events: ProbeEventTx,
}

impl PollTask {
    /// Re-reads the connection live right now.
    ///
    /// Returns `None` once this session has been torn down or replaced.
    /// The holder is consulted at every tick; values captured when the
    /// task was spawned are never trusted across a suspension point.
    fn current_connection(&self) -> Option<Arc<dyn GraphConnection>> {
        let shared = session::lock(&self.shared);
        if self.cancel.is_cancelled() || shared.epoch != self.epoch {
            return None;
        }
        shared.connection.clone()
    }
}

pub(crate) async fn run(task: PollTask) {
    loop {
        // Capture at schedule time: this tick operates on the connection
        // that was live when it was armed, or not at all.
        let Some(connection) = task.current_connection() else {
            break;
        };

        let outcome = run_query(connection.as_ref(), &task.query).await;

        // Torn down while the query was in flight: no report, no rearm.
        if task.cancel.is_cancelled() {
            break;
        }

        match outcome {
            Ok(summary) => {
                debug!(
                    records = summary.records,
                    latency_ms = summary.latency_ms,
                    "poll succeeded"
                );
                let _ = task.events.send(ProbeEvent::PollSucceeded { summary });
            }
            Err(err) => {
                // One failed query is fatal to the session: report, tear
                // down, and leave reconnecting to the operator.
                warn!(%err, "poll failed");
                let _ = task.events.send(ProbeEvent::Error {
                    kind: ErrorKind::Query,
                    message: err.message,
                    details: err.details,
                });
                session::teardown_current(&task.shared, &task.events, task.epoch).await;
                break;
            }
        }

        // Rearm only after the previous tick is fully processed, so two
        // polls never overlap. The sleep is edge-triggered: fires once,
        // explicitly rearmed on the next pass.
        tokio::select! {
            () = task.cancel.cancelled() => break,
            () = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }
}

/// Runs one query through a scoped session: opened immediately before the
/// query, closed immediately after, success or not.
async fn run_query(
    connection: &dyn GraphConnection,
    query: &Query,
) -> Result<RecordSummary, ClientError> {
    let mut session = connection.session();
    let outcome = session.read_only_query(query.as_str()).await;
    let closed = session.close().await;

    match (outcome, closed) {
        (Ok(summary), Ok(())) => Ok(summary),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            debug!(%close_err, "session close failed after query error");
            Err(err)
        }
    }
}
