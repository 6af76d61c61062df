//! UI rendering for the TUI.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::core::datetime::{format_clock, relative_day_heading, time_label_in};
use crate::core::Clock;
use crate::features::timer::TimerState;
use crate::storage::KeyValueStore;
use crate::tui::app::App;

const fn state_color(state: TimerState) -> Color {
    match state {
        TimerState::Idle => Color::White,
        TimerState::Running => Color::Green,
        TimerState::Paused => Color::Yellow,
        TimerState::Distracted => Color::Red,
    }
}

/// Render the application UI.
pub fn render<K: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<K, C>) {
    // Create layout: header, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Timer or history
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    if app.show_history {
        render_history(frame, app, chunks[1]);
    } else {
        render_timer(frame, app, chunks[1]);
    }
    render_status_bar(frame, app, chunks[2]);
}

/// Render the header.
fn render_header<K: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<K, C>, area: Rect) {
    let state = app.timer.state();
    let title = format!(
        " Deep Work | {} | {} sessions saved ",
        state.to_string().to_uppercase(),
        app.store.len()
    );

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(state_color(state))
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

/// Render the running clock, the open distraction and this session's log.
fn render_timer<K: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<K, C>, area: Rect) {
    let state = app.timer.state();
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            format_clock(app.timer.elapsed_seconds()),
            Style::default()
                .fg(state_color(state))
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    if state == TimerState::Distracted {
        lines.push(Line::from(Span::styled(
            format!(
                "Distracted for {}",
                format_clock(app.timer.distraction_elapsed_seconds())
            ),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(vec![
            Span::styled("What pulled you away? ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}_", app.reason),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::default());
    }

    let pending = app.timer.pending_distractions();
    if !pending.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Distractions this session: {}", pending.len()),
            Style::default().fg(Color::Yellow),
        )));
        for d in pending.iter().rev() {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}  ", time_label_in(&d.logged_at, &Local))),
                Span::raw(d.reason.clone()),
                Span::styled(
                    format!("  {}", format_clock(d.duration_seconds)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }

    let body = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    frame.render_widget(body, area);
}

/// Render saved sessions grouped by day, each with its distractions.
fn render_history<K: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<K, C>, area: Rect) {
    let today = app.today();
    let mut items: Vec<ListItem<'_>> = Vec::new();

    for group in app.store.group_by_date() {
        let heading = group
            .date
            .map_or_else(|| "Unknown date".to_string(), |d| relative_day_heading(d, today));
        items.push(ListItem::new(Line::from(vec![
            Span::styled(heading, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {}", format_clock(group.total_seconds())),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!("  {} distractions", group.distraction_count()),
                Style::default().fg(Color::DarkGray),
            ),
        ])));

        for session in &group.sessions {
            items.push(ListItem::new(Line::from(vec![
                Span::raw(format!("  {}  ", time_label_in(&session.ended_at, &Local))),
                Span::raw(format_clock(session.duration_seconds)),
                Span::styled(
                    format!("  {}", session.distraction_count()),
                    Style::default().fg(Color::Yellow),
                ),
            ])));

            for d in &session.distractions {
                items.push(ListItem::new(Line::from(vec![
                    Span::raw(format!("      - {}", d.reason)),
                    Span::styled(
                        format!("  {}", format_clock(d.duration_seconds)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])));
            }
        }
    }

    let offset = app.history_scroll.min(items.len().saturating_sub(1));
    let mut items: Vec<ListItem<'_>> = items.into_iter().skip(offset).collect();

    if items.is_empty() {
        items.push(ListItem::new("No sessions yet"));
    }

    let list = List::new(items).block(
        Block::default()
            .title(" History ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    frame.render_widget(list, area);
}

/// Render the status bar.
fn render_status_bar<K: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<K, C>, area: Rect) {
    let status_text = app.status.as_deref().unwrap_or_else(|| app.help());

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}
