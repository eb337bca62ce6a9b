//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(state, event)`
//! and executes the returned effects. This is the single source of truth
//! for how events modify state.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use graphping_core::client::{Credentials, Query};
use graphping_core::core::events::{ErrorKind, ProbeEvent};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, Field, LogKind, Phase};

/// The main reducer function.
pub fn update(state: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => vec![],
        UiEvent::Terminal(event) => handle_terminal_event(state, event),
        UiEvent::Probe(event) => handle_probe_event(state, event),
    }
}

fn handle_terminal_event(state: &mut AppState, event: Event) -> Vec<UiEffect> {
    let Event::Key(key) = event else {
        return vec![];
    };
    if key.kind != KeyEventKind::Press {
        return vec![];
    }
    handle_key(state, key)
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            vec![UiEffect::Quit]
        }
        KeyCode::Enter => submit(state),
        KeyCode::Tab | KeyCode::Down => {
            state.form.focus = state.form.focus.next();
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            state.form.focus = state.form.focus.prev();
            vec![]
        }
        KeyCode::Backspace => {
            if field_editable(state, state.form.focus) {
                state.form.field_mut(state.form.focus).pop();
            }
            vec![]
        }
        KeyCode::Char(c) => {
            if field_editable(state, state.form.focus) {
                state.form.field_mut(state.form.focus).push(c);
            }
            vec![]
        }
        _ => vec![],
    }
}

/// The query is read-only while connected: the polling loop reissues the
/// query it started with, so mid-session edits would only mislead.
fn field_editable(state: &AppState, field: Field) -> bool {
    field != Field::Query || state.phase.connect_available()
}

/// Enter triggers whichever side of the toggle is available.
fn submit(state: &mut AppState) -> Vec<UiEffect> {
    if state.phase.connect_available() {
        // Snapshot the form now; later edits must not reach this connect.
        vec![UiEffect::Connect {
            credentials: Credentials {
                endpoint: state.form.endpoint.clone(),
                username: state.form.username.clone(),
                password: state.form.password.clone(),
            },
            query: Query::new(state.form.query.clone()),
        }]
    } else {
        vec![UiEffect::Disconnect]
    }
}

fn handle_probe_event(state: &mut AppState, event: ProbeEvent) -> Vec<UiEffect> {
    match event {
        ProbeEvent::Connected { endpoint } => {
            state.push_log(LogKind::Info, format!("connected to {endpoint}"));
            state.phase = Phase::Connected { endpoint };
        }
        ProbeEvent::Disconnected => {
            state.phase = Phase::Idle;
            state.push_log(LogKind::Info, "disconnected");
        }
        ProbeEvent::PollSucceeded { summary } => {
            state.push_log(
                LogKind::Success,
                format!(
                    "ok: {} record(s) in {} ms",
                    summary.records, summary.latency_ms
                ),
            );
        }
        ProbeEvent::Error {
            kind,
            message,
            details,
        } => {
            // Dial and query failures end the session; teardown errors are
            // informational (the core already cleared its state).
            if matches!(kind, ErrorKind::Dial | ErrorKind::Query) {
                state.phase = Phase::Idle;
            }
            let text = match details {
                Some(details) => format!("{kind} failed: {message} ({details})"),
                None => format!("{kind} failed: {message}"),
            };
            state.push_log(LogKind::Error, text);
        }
    }
    vec![]
}

#[cfg(test)]
mod tests {
    use graphping_core::client::RecordSummary;
    use graphping_core::config::Config;

    use super::*;

    fn state() -> AppState {
        AppState::new(&Config::default())
    }

    fn press(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn connected(state: &mut AppState) {
        let effects = update(
            state,
            UiEvent::Probe(ProbeEvent::Connected {
                endpoint: "http://localhost:7474".to_string(),
            }),
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn enter_while_idle_snapshots_the_form() {
        let mut state = state();
        state.form.endpoint = "http://db.internal:7474".to_string();
        state.form.password = "secret".to_string();

        let effects = update(&mut state, press(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![UiEffect::Connect {
                credentials: Credentials {
                    endpoint: "http://db.internal:7474".to_string(),
                    username: "neo4j".to_string(),
                    password: "secret".to_string(),
                },
                query: Query::new("RETURN 1"),
            }]
        );
        // The toggle only flips when the core reports Connected.
        assert!(state.phase.connect_available());
    }

    #[test]
    fn enter_while_connected_disconnects() {
        let mut state = state();
        connected(&mut state);

        let effects = update(&mut state, press(KeyCode::Enter));
        assert_eq!(effects, vec![UiEffect::Disconnect]);
    }

    #[test]
    fn toggle_outputs_are_complements() {
        let mut state = state();
        assert!(state.phase.connect_available());
        assert!(!state.phase.disconnect_available());

        connected(&mut state);
        assert!(!state.phase.connect_available());
        assert!(state.phase.disconnect_available());

        update(&mut state, UiEvent::Probe(ProbeEvent::Disconnected));
        assert!(state.phase.connect_available());
        assert!(!state.phase.disconnect_available());
    }

    #[test]
    fn query_edits_are_ignored_while_connected() {
        let mut state = state();
        state.form.focus = Field::Query;

        update(&mut state, press(KeyCode::Char('x')));
        assert_eq!(state.form.query, "RETURN 1x");

        connected(&mut state);
        update(&mut state, press(KeyCode::Char('y')));
        update(&mut state, press(KeyCode::Backspace));
        assert_eq!(state.form.query, "RETURN 1x");
    }

    #[test]
    fn endpoint_edits_still_allowed_while_connected() {
        let mut state = state();
        connected(&mut state);
        state.form.focus = Field::Endpoint;

        update(&mut state, press(KeyCode::Char('x')));
        assert!(state.form.endpoint.ends_with('x'));
    }

    #[test]
    fn dial_and_query_errors_return_to_idle() {
        for kind in [ErrorKind::Dial, ErrorKind::Query] {
            let mut state = state();
            connected(&mut state);

            update(
                &mut state,
                UiEvent::Probe(ProbeEvent::Error {
                    kind,
                    message: "boom".to_string(),
                    details: None,
                }),
            );
            assert!(state.phase.connect_available(), "{kind} must end the session");
        }
    }

    #[test]
    fn teardown_error_does_not_flip_the_toggle() {
        let mut state = state();
        connected(&mut state);

        update(
            &mut state,
            UiEvent::Probe(ProbeEvent::Error {
                kind: ErrorKind::Teardown,
                message: "close failed".to_string(),
                details: None,
            }),
        );
        assert!(state.phase.disconnect_available());
    }

    #[test]
    fn poll_success_logs_without_state_change() {
        let mut state = state();
        connected(&mut state);
        let before = state.log.len();

        update(
            &mut state,
            UiEvent::Probe(ProbeEvent::PollSucceeded {
                summary: RecordSummary {
                    records: 1,
                    latency_ms: 3,
                },
            }),
        );
        assert_eq!(state.log.len(), before + 1);
        assert!(state.phase.disconnect_available());
    }

    #[test]
    fn escape_quits() {
        let mut state = state();
        assert_eq!(update(&mut state, press(KeyCode::Esc)), vec![UiEffect::Quit]);
    }
}
