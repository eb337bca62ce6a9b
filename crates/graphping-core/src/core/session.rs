//! Session controller: the idle/connected toggle and its resources.
//!
//! The controller owns the single live connection and the single pending
//! timer (the polling task's cancellation token). Both live in one shared
//! holder with synchronous access; the polling loop re-reads the holder at
//! every suspension point instead of trusting values captured when its task
//! was spawned — state can be replaced or cleared while a tick is suspended
//! on network I/O.
//!
//! Operator actions are serialized: either call the controller methods
//! directly (they take `&mut self`), or run it as a worker via [`spawn`]
//! and queue [`SessionCommand`]s from the UI.
//!
//! [`spawn`]: SessionController::spawn

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::{Credentials, GraphClient, GraphConnection, Query};
use crate::core::events::{ErrorKind, ProbeEvent};
use crate::core::poller::{self, PollTask};

pub type ProbeEventTx = mpsc::UnboundedSender<ProbeEvent>;
pub type ProbeEventRx = mpsc::UnboundedReceiver<ProbeEvent>;

/// Creates the event channel between the session core and its observer.
pub fn create_event_channel() -> (ProbeEventTx, ProbeEventRx) {
    mpsc::unbounded_channel()
}

/// Shared session state: the live connection and the pending timer's token.
///
/// Both are set together when a session goes live and cleared together on
/// teardown. The epoch counts dials, so a poll task resuming after its
/// session was replaced can tell the holder no longer belongs to it.
#[derive(Default)]
pub(crate) struct Shared {
    pub(crate) connection: Option<Arc<dyn GraphConnection>>,
    pub(crate) cancel: Option<CancellationToken>,
    pub(crate) epoch: u64,
}

pub(crate) type SharedState = Arc<Mutex<Shared>>;

/// Locks the shared holder. The lock is only ever held for synchronous
/// reads and writes, never across an await.
pub(crate) fn lock(shared: &SharedState) -> MutexGuard<'_, Shared> {
    shared.lock().expect("session state lock poisoned")
}

/// Operator actions, processed strictly in order by the session worker.
#[derive(Debug)]
pub enum SessionCommand {
    Connect {
        credentials: Credentials,
        query: Query,
    },
    Disconnect,
    /// Final teardown on process exit; ends the worker.
    Shutdown,
}

pub type SessionCommandTx = mpsc::UnboundedSender<SessionCommand>;

/// Owns the idle/connected toggle and the session resources.
pub struct SessionController {
    client: Arc<dyn GraphClient>,
    shared: SharedState,
    events: ProbeEventTx,
}

impl SessionController {
    pub fn new(client: Arc<dyn GraphClient>, events: ProbeEventTx) -> Self {
        Self {
            client,
            shared: Arc::new(Mutex::new(Shared::default())),
            events,
        }
    }

    /// True while a connection is held (the disconnect side of the toggle).
    pub fn is_connected(&self) -> bool {
        lock(&self.shared).connection.is_some()
    }

    /// Tears down any previous session, dials, and starts the polling loop.
    ///
    /// Safe to call in any state: a full stop runs first, so at most one
    /// connection and one pending timer ever exist. A failed dial is
    /// reported like a poll failure — an `Error` event with `kind = Dial`,
    /// no loop started, toggle left idle.
    pub async fn connect(&mut self, credentials: Credentials, query: Query) {
        teardown(&self.shared, &self.events).await;

        debug!(endpoint = %credentials.endpoint, "dialing");
        let connection = match self.client.connect(&credentials).await {
            Ok(connection) => connection,
            Err(err) => {
                warn!(%err, "dial failed");
                let _ = self.events.send(ProbeEvent::Error {
                    kind: ErrorKind::Dial,
                    message: err.message,
                    details: err.details,
                });
                return;
            }
        };

        let cancel = CancellationToken::new();
        let epoch = {
            let mut shared = lock(&self.shared);
            shared.epoch += 1;
            shared.connection = Some(Arc::clone(&connection));
            shared.cancel = Some(cancel.clone());
            shared.epoch
        };

        let _ = self.events.send(ProbeEvent::Connected {
            endpoint: credentials.endpoint,
        });

        tokio::spawn(poller::run(PollTask {
            shared: Arc::clone(&self.shared),
            cancel,
            epoch,
            query,
            events: self.events.clone(),
        }));
    }

    /// Stops the session (if any) and reports the idle toggle.
    ///
    /// Callable at any time; while already idle the teardown is a no-op
    /// and only the reconciling `Disconnected` event is emitted.
    pub async fn disconnect(&mut self) {
        teardown(&self.shared, &self.events).await;
        let _ = self.events.send(ProbeEvent::Disconnected);
    }

    /// Runs the controller as a worker task that serializes operator
    /// actions. The worker performs a final teardown when it stops, on
    /// `Shutdown` or when the handle is dropped.
    pub fn spawn(mut self) -> SessionHandle {
        let (commands, mut rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    SessionCommand::Connect { credentials, query } => {
                        self.connect(credentials, query).await;
                    }
                    SessionCommand::Disconnect => self.disconnect().await,
                    SessionCommand::Shutdown => break,
                }
            }
            // The process never exits holding a live connection or an
            // armed timer.
            teardown(&self.shared, &self.events).await;
        });
        SessionHandle { commands, worker }
    }
}

/// Command handle for a spawned session worker.
pub struct SessionHandle {
    commands: SessionCommandTx,
    worker: JoinHandle<()>,
}

impl SessionHandle {
    /// Queues an operator action; actions are processed strictly in order.
    pub fn dispatch(&self, command: SessionCommand) {
        let _ = self.commands.send(command);
    }

    /// Stops the worker after a final teardown and waits for it.
    pub async fn shutdown(self) {
        let _ = self.commands.send(SessionCommand::Shutdown);
        let _ = self.worker.await;
    }
}

/// Order-safe teardown: cancel the pending timer, then close the
/// connection. Tolerates either or both being absent; after return both
/// are guaranteed clear.
pub(crate) async fn teardown(shared: &SharedState, events: &ProbeEventTx) {
    let (connection, cancel) = {
        let mut shared = lock(shared);
        (shared.connection.take(), shared.cancel.take())
    };
    release(connection, cancel, events).await;
}

/// Teardown for the poller's failure path: only clears the holder if it
/// still belongs to the given epoch. A newer session's connect has
/// already torn the old one down otherwise.
pub(crate) async fn teardown_current(shared: &SharedState, events: &ProbeEventTx, epoch: u64) {
    let (connection, cancel) = {
        let mut shared = lock(shared);
        if shared.epoch != epoch {
            return;
        }
        (shared.connection.take(), shared.cancel.take())
    };
    release(connection, cancel, events).await;
}

async fn release(
    connection: Option<Arc<dyn GraphConnection>>,
    cancel: Option<CancellationToken>,
    events: &ProbeEventTx,
) {
    // Timer before connection: a timer left armed past the close could
    // fire a tick against a dead connection.
    if let Some(cancel) = cancel {
        cancel.cancel();
    }

    if let Some(connection) = connection {
        if let Err(err) = connection.close().await {
            // Local state is already cleared; a stuck handle would be
            // worse than a leaked remote connection.
            warn!(%err, "closing connection failed during teardown");
            let _ = events.send(ProbeEvent::Error {
                kind: ErrorKind::Teardown,
                message: err.message,
                details: err.details,
            });
        }
    }
}
