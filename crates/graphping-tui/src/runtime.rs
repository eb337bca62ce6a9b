//! TUI runtime - owns the terminal and the session worker, runs the event
//! loop, executes effects.
//!
//! The reducer stays pure and produces effects; this module executes them.
//! Operator actions go to the session worker as commands; session events
//! come back over the probe channel and are drained each pass, so the
//! toggle always reflects the core's real state.

use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use graphping_core::client::HttpGraphClient;
use graphping_core::config::Config;
use graphping_core::core::interrupt;
use graphping_core::core::session::{
    ProbeEventRx, SessionCommand, SessionController, SessionHandle, create_event_channel,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Render/tick cadence; terminal input is polled at this granularity.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Terminal state is guaranteed to be restored on drop, panic, or Ctrl+C.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    session: SessionHandle,
    probe_rx: ProbeEventRx,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime and takes over the terminal.
    pub fn new(config: Config) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });

        // Reset interrupt flag in case it was set from a previous run
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::new(&config);
        let (events_tx, probe_rx) = create_event_channel();
        let client = Arc::new(HttpGraphClient::new(config.database));
        let session = SessionController::new(client, events_tx).spawn();

        Ok(Self {
            terminal,
            state,
            session,
            probe_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the event loop until quit, then tears everything down.
    pub async fn run(mut self) -> Result<()> {
        let result = self.event_loop();

        // Process shutdown is a teardown path too: the worker runs a final
        // stop (cancel timer, close connection) before the terminal goes
        // back to normal.
        self.session.shutdown().await;
        let restored = terminal::restore_terminal();

        result.and(restored)
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.should_quit {
            // Ctrl+C delivered as a signal (outside raw mode) lands here;
            // inside raw mode it arrives as a key event instead.
            if interrupt::is_interrupted() {
                self.state.should_quit = true;
                break;
            }

            for event in self.collect_events()? {
                // Tick only paces the loop; everything else changes state.
                if !matches!(event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects events from the session channel and the terminal.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Drain session events first so the toggle reflects the newest state.
        while let Ok(event) = self.probe_rx.try_recv() {
            events.push(UiEvent::Probe(event));
        }

        // Block on terminal input until the next tick boundary.
        let timeout = TICK_INTERVAL.saturating_sub(self.last_tick.elapsed());
        if event::poll(timeout).context("poll terminal events")? {
            events.push(UiEvent::Terminal(
                event::read().context("read terminal event")?,
            ));
        }

        if self.last_tick.elapsed() >= TICK_INTERVAL {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            match effect {
                UiEffect::Connect { credentials, query } => {
                    debug!(endpoint = %credentials.endpoint, "connect requested");
                    self.session
                        .dispatch(SessionCommand::Connect { credentials, query });
                }
                UiEffect::Disconnect => {
                    debug!("disconnect requested");
                    self.session.dispatch(SessionCommand::Disconnect);
                }
                UiEffect::Quit => self.state.should_quit = true,
            }
        }
    }
}
