//! TUI rendering with ratatui
//!
//! Status bar on top, the device tree and endpoint detail side by side, and
//! a key hint bar at the bottom.

use model::{DeviceSource, EndpointRow, Selection};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::time::Duration;

use super::app::{App, Dialog, TreeRow};

/// Main render function
pub fn render<S: DeviceSource>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(10),   // Tree + details
            Constraint::Length(3), // Help bar
        ])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_status_bar(frame, app, chunks[0]);
    render_device_tree(frame, app, panes[0]);
    render_endpoint_pane(frame, app, panes[1]);
    render_help_bar(frame, chunks[2]);

    if app.dialog() == Dialog::Help {
        render_help_dialog(frame);
    }
}

fn render_status_bar<S: DeviceSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let selection = match app.presenter().selection().state() {
        Selection::Selected(key) => key.to_string(),
        Selection::Unselected => "none".to_string(),
    };

    let status_text = vec![
        Span::styled("Devices: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.presenter().snapshot().len().to_string(),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  |  "),
        Span::styled("Selected: ", Style::default().fg(Color::DarkGray)),
        Span::styled(selection, Style::default().fg(Color::Cyan)),
        Span::raw("  |  "),
        Span::styled("Refreshed: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{} ago", format_duration(app.since_refresh())),
            Style::default().fg(Color::Green),
        ),
    ];

    let status = Paragraph::new(Line::from(status_text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" USB Devices ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(status, area);
}

fn render_device_tree<S: DeviceSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let presenter = app.presenter();
    let snapshot = presenter.snapshot();
    let selected = presenter.selection().selected();
    let rows = app.visible_rows();

    let items: Vec<ListItem> = rows
        .iter()
        .filter_map(|row| match *row {
            TreeRow::Device(group) => {
                let device = &snapshot.group(group)?.device;
                let marker = if presenter.is_expanded(group) { "▾ " } else { "▸ " };
                Some(ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(marker),
                        Span::styled(
                            device.name.clone(),
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "  {}  {}  {}  {}",
                            device.id, device.class, device.vendor_id, device.product_id
                        ),
                        Style::default().fg(Color::Gray),
                    )),
                ]))
            }
            TreeRow::Interface { group, child } => {
                let row = snapshot.group(group)?.interfaces.get(child)?;
                let is_selected = selected == Some(row.interface.key());
                let (marker, style) = if is_selected {
                    ("● ", Style::default().fg(Color::Green))
                } else {
                    ("  ", Style::default())
                };
                Some(ListItem::new(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(marker, style),
                    Span::styled(row.to_string(), style),
                ])))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Devices ({}) ", snapshot.len()))
                .border_style(Style::default().fg(Color::Blue)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.cursor()));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_endpoint_pane<S: DeviceSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let Some(listing) = app.detail().listing() else {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Select an interface to show its endpoints",
            Style::default().fg(Color::DarkGray),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Endpoints ")
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    };

    let mut lines = Vec::new();
    if listing.is_empty() {
        lines.push(Line::from(Span::styled(
            "No endpoints",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (idx, row) in listing.rows().iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        lines.extend(endpoint_lines(row));
    }

    let details = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    " Endpoints: {} ({}) ",
                    listing.interface(),
                    listing.rows().len()
                ))
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(details, area);
}

fn endpoint_lines(row: &EndpointRow) -> Vec<Line<'static>> {
    let header = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    vec![
        Line::from(Span::styled(row.number.clone(), header)),
        Line::from(format!("  {}", row.address)),
        Line::from(format!("  {}", row.attributes)),
        Line::from(format!("  {}", row.direction)),
        Line::from(format!("  {}", row.interval)),
        Line::from(format!("  {}", row.max_packet_size)),
        Line::from(format!("  {}", row.transfer_type)),
    ]
}

fn key_hint(key: &'static str) -> Span<'static> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        key_hint("q"),
        Span::raw(" Quit  "),
        key_hint("j/k"),
        Span::raw(" Navigate  "),
        key_hint("Enter"),
        Span::raw(" Expand/Select  "),
        key_hint("Esc"),
        Span::raw(" Deselect  "),
        key_hint("r"),
        Span::raw(" Refresh  "),
        key_hint("?"),
        Span::raw(" Help"),
    ];

    let help = Paragraph::new(Line::from(help_text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(help, area);
}

fn render_help_dialog(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let binding = |keys: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<16}", keys), Style::default().fg(Color::Cyan)),
            Span::raw(text),
        ])
    };

    let help_content = vec![
        section("Navigation"),
        Line::from(""),
        binding("Up / k", "Move cursor up"),
        binding("Down / j", "Move cursor down"),
        Line::from(""),
        section("Actions"),
        Line::from(""),
        binding("Enter / Space", "Expand or collapse a device, select an interface"),
        binding("Esc / Backspace", "Clear the selected interface"),
        binding("r", "Re-enumerate devices"),
        Line::from(""),
        section("General"),
        Line::from(""),
        binding("?", "Show this help"),
        binding("q / Ctrl+C", "Quit (or close this dialog)"),
    ];

    let help = Paragraph::new(help_content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Create a centered rectangle for dialogs
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Format duration for display
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
