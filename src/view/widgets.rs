//! Frame layout of the terminal dashboard, drawn with `ratatui`.
//!
//! ```text
//! ┌ capview ─ status ─ controls ───────────────────────────────┐
//! ├ statistics ────────────────────────────────────────────────┤
//! ├ protocol distribution ─────┬ top talkers ──────────────────┤
//! ├ recent packets ────────────┴──────────┬ devices ───────────┤
//! ├ notifications ────────────────────────┴────────────────────┤
//! ```
//!
//! Every frame is drawn from scratch out of a [`DashboardState`] snapshot.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    BarChart, Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, Wrap,
};
use ratatui::Frame;

use super::dashboard_state::{ChartHandle, DashboardState};
use super::types::{TableBody, TableRow};
use crate::notification::Notification;

/// Notifications shown at once, newest last.
pub const VISIBLE_NOTIFICATIONS: usize = 3;

const PACKET_HEADERS: [&str; 7] = [
    "Time",
    "Source",
    "Src Port",
    "Destination",
    "Dst Port",
    "Protocol",
    "Size",
];
const DEVICE_HEADERS: [&str; 3] = ["IP", "MAC", "Hostname"];

/// Modal content drawn on top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay<'a> {
    /// Yes/no question; the answer keys are listed under it.
    Confirm(&'a str),
    /// `(key, action)` pairs.
    Help(&'a [(&'a str, &'a str)]),
}

pub fn hex_color(hex: &str) -> Color {
    hex.parse().unwrap_or(Color::Reset)
}

pub fn draw_dashboard(
    frame: &mut Frame,
    state: &DashboardState,
    notifications: &[Notification],
    overlay: Option<Overlay<'_>>,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(12),
            Constraint::Min(6),
            Constraint::Length(VISIBLE_NOTIFICATIONS as u16 + 2),
        ])
        .split(frame.size());

    frame.render_widget(header(state), rows[0]);
    frame.render_widget(stats(state), rows[1]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[2]);
    draw_protocol_chart(frame, &state.protocol_chart, charts[0]);
    draw_talkers_chart(frame, &state.talkers_chart, charts[1]);

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[3]);
    draw_table(
        frame,
        " Recent Packets ",
        &PACKET_HEADERS,
        &[
            Constraint::Length(23),
            Constraint::Length(15),
            Constraint::Length(8),
            Constraint::Length(15),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(8),
        ],
        &state.packets,
        tables[0],
    );
    draw_table(
        frame,
        " Devices ",
        &DEVICE_HEADERS,
        &[
            Constraint::Length(15),
            Constraint::Length(17),
            Constraint::Min(8),
        ],
        &state.devices,
        tables[1],
    );

    frame.render_widget(notification_list(notifications), rows[4]);

    if let Some(overlay) = overlay {
        draw_overlay(frame, overlay);
    }
}

fn key_hint(key: &str, action: &str, enabled: bool) -> Vec<Span<'static>> {
    let style = if enabled {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    vec![
        Span::styled(format!("[{}] {}", key, action), style),
        Span::raw("  "),
    ]
}

fn header(state: &DashboardState) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(
        "capview  ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(stats) = &state.stats {
        spans.push(Span::styled(
            format!("● {}", stats.status.text),
            Style::default().fg(hex_color(&stats.status.color)),
        ));
        spans.push(Span::raw("   "));
    }
    spans.extend(key_hint("s", "Start", state.controls.start_enabled));
    spans.extend(key_hint("t", "Stop", state.controls.stop_enabled));
    spans.extend(key_hint("n", "Scan Network", !state.scan_busy));
    spans.extend(key_hint("e", "Export", true));
    spans.extend(key_hint("r", "Reset", true));
    spans.extend(key_hint("?", "Help", true));
    spans.extend(key_hint("q", "Quit", true));
    if state.scan_busy {
        spans.push(Span::styled(
            "Scanning...",
            Style::default().fg(Color::Yellow),
        ));
    }

    Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL))
}

fn stats(state: &DashboardState) -> Paragraph<'static> {
    let line = match &state.stats {
        Some(stats) => Line::from(vec![
            Span::raw("Packets: "),
            Span::styled(stats.total_packets.clone(), Style::default().fg(Color::White)),
            Span::raw("   Data: "),
            Span::styled(stats.total_data.clone(), Style::default().fg(Color::White)),
            Span::raw("   Active IPs: "),
            Span::styled(stats.active_ips.clone(), Style::default().fg(Color::White)),
            Span::raw("   Duration: "),
            Span::styled(stats.duration.clone(), Style::default().fg(Color::White)),
        ]),
        None => Line::from(Span::styled(
            "Waiting for statistics...",
            Style::default().fg(Color::DarkGray),
        )),
    };
    Paragraph::new(line).block(
        Block::default()
            .title(" Statistics ")
            .borders(Borders::ALL),
    )
}

fn no_data(title: &'static str) -> Paragraph<'static> {
    Paragraph::new("No data")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().title(title).borders(Borders::ALL))
}

fn draw_protocol_chart(frame: &mut Frame, chart: &ChartHandle, area: Rect) {
    const TITLE: &str = " Protocol Distribution ";
    if chart.is_empty() {
        frame.render_widget(no_data(TITLE), area);
        return;
    }

    let label_width = chart.labels().iter().map(|l| l.len()).max().unwrap_or(0);
    let items: Vec<ListItem> = chart
        .shares()
        .into_iter()
        .map(|(label, value, share)| {
            ListItem::new(format!(
                "{:<w$}  {:>8}  {:5.1}%",
                label,
                value,
                share,
                w = label_width
            ))
        })
        .collect();
    frame.render_widget(
        List::new(items).block(Block::default().title(TITLE).borders(Borders::ALL)),
        area,
    );
}

fn draw_talkers_chart(frame: &mut Frame, chart: &ChartHandle, area: Rect) {
    const TITLE: &str = " Top Talkers ";
    if chart.is_empty() {
        frame.render_widget(no_data(TITLE), area);
        return;
    }

    let data: Vec<(&str, u64)> = chart
        .labels()
        .iter()
        .map(String::as_str)
        .zip(chart.values().iter().copied())
        .collect();
    let bar_width = chart
        .labels()
        .iter()
        .map(|l| l.len())
        .max()
        .unwrap_or(1)
        .clamp(3, 15) as u16;

    let bars = BarChart::default()
        .block(Block::default().title(TITLE).borders(Borders::ALL))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .data(&data[..]);
    frame.render_widget(bars, area);
}

fn draw_table(
    frame: &mut Frame,
    title: &'static str,
    headers: &[&'static str],
    widths: &[Constraint],
    body: &TableBody,
    area: Rect,
) {
    let block = Block::default().title(title).borders(Borders::ALL);

    if let [TableRow::EmptyState { message, .. }] = body.rows.as_slice() {
        let empty = Paragraph::new(message.clone())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = body
        .rows
        .iter()
        .map(|row| match row {
            TableRow::Record(cells) => Row::new(cells.clone()),
            TableRow::EmptyState { message, .. } => Row::new(vec![message.clone()]),
        })
        .collect();
    let table = Table::new(rows, widths.to_vec())
        .header(
            Row::new(headers.to_vec())
                .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)),
        )
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, area);
}

fn notification_list(notifications: &[Notification]) -> List<'static> {
    let start = notifications.len().saturating_sub(VISIBLE_NOTIFICATIONS);
    let items: Vec<ListItem> = notifications[start..]
        .iter()
        .map(|n| {
            ListItem::new(Line::from(Span::styled(
                n.to_string(),
                Style::default().fg(hex_color(n.severity.color())),
            )))
        })
        .collect();
    List::new(items).block(
        Block::default()
            .title(" Notifications ")
            .borders(Borders::ALL),
    )
}

/// A `width` x `height` rectangle centred in `area`, clipped to it.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_overlay(frame: &mut Frame, overlay: Overlay<'_>) {
    let (title, lines): (&str, Vec<Line>) = match overlay {
        Overlay::Confirm(prompt) => (
            " Confirm ",
            vec![
                Line::from(prompt.to_string()),
                Line::from(""),
                Line::from(Span::styled(
                    "[y] Yes    [n] No",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ],
        ),
        Overlay::Help(bindings) => (
            " Keys ",
            bindings
                .iter()
                .map(|(key, action)| Line::from(format!("{:>6}  {}", key, action)))
                .collect(),
        ),
    };

    let area = centered(frame.size(), 64, lines.len() as u16 + 4);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(title).borders(Borders::ALL)),
        area,
    );
}
