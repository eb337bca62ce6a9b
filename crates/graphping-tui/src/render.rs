//! Rendering for the probe TUI.
//!
//! Layout: connection form on top, toggle + status line below it, and the
//! result log filling the rest.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph};

use crate::state::{AppState, Field, LogKind, Phase};

pub fn render(state: &AppState, frame: &mut Frame) {
    let [form_area, toggle_area, log_area] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(2),
        Constraint::Min(3),
    ])
    .areas(frame.area());

    render_form(state, frame, form_area);
    render_toggle(state, frame, toggle_area);
    render_log(state, frame, log_area);
}

fn render_form(state: &AppState, frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = Field::ALL
        .iter()
        .map(|&field| {
            let focused = state.form.focus == field;
            let label_style = if focused {
                Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::new().fg(Color::Gray)
            };
            let value = if field == Field::Password {
                "•".repeat(state.form.password.chars().count())
            } else {
                state.form.field(field).to_string()
            };
            // The query is locked while connected; dim it to say so.
            let value_style = if field == Field::Query && state.phase.disconnect_available() {
                Style::new().add_modifier(Modifier::DIM)
            } else {
                Style::new()
            };
            let marker = if focused { "› " } else { "  " };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<10}", field.label()), label_style),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    let block = Block::bordered().title(" graphping ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_toggle(state: &AppState, frame: &mut Frame, area: Rect) {
    let connect_style = if state.phase.connect_available() {
        Style::new().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::new().add_modifier(Modifier::DIM)
    };
    let disconnect_style = if state.phase.disconnect_available() {
        Style::new().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::new().add_modifier(Modifier::DIM)
    };

    let status = match &state.phase {
        Phase::Idle => Span::styled("idle", Style::new().add_modifier(Modifier::DIM)),
        Phase::Connected { endpoint } => Span::styled(
            format!("polling {endpoint}"),
            Style::new().fg(Color::Green),
        ),
    };

    let toggle = Line::from(vec![
        Span::raw(" "),
        Span::styled("[ Connect ]", connect_style),
        Span::raw("  "),
        Span::styled("[ Disconnect ]", disconnect_style),
        Span::raw("  "),
        status,
    ]);
    let hint = Line::from(Span::styled(
        " tab move · enter connect/disconnect · esc quit",
        Style::new().add_modifier(Modifier::DIM),
    ));

    frame.render_widget(Paragraph::new(vec![toggle, hint]), area);
}

fn render_log(state: &AppState, frame: &mut Frame, area: Rect) {
    let visible = usize::from(area.height.saturating_sub(2)).max(1);
    let items: Vec<ListItem> = state
        .log
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|entry| {
            let color = match entry.kind {
                LogKind::Info => Color::Cyan,
                LogKind::Success => Color::Green,
                LogKind::Error => Color::Red,
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry.at.format("%H:%M:%S ").to_string(),
                    Style::new().add_modifier(Modifier::DIM),
                ),
                Span::styled(entry.text.clone(), Style::new().fg(color)),
            ]))
        })
        .collect();

    let block = Block::bordered().title(" results ");
    frame.render_widget(List::new(items).block(block), area);
}
