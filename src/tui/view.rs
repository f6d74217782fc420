use crate::controller::UserInfoDialog;
use crate::model::DeliveryStatus;
use crate::notify::ToastKind;
use crate::tui::state::{AppState, InputMode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
};

const NAV_ITEMS: [(&str, &str); 4] = [
    ("D", "Dashboard"),
    ("E", "Events"),
    ("U", "Users"),
    ("S", "Settings"),
];

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let sidebar_width = state.screen.layout().sidebar_width();
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
        .split(v_chunks[1]);

    draw_header(f, state, v_chunks[0]);
    draw_sidebar(f, state, h_chunks[0]);
    draw_events(f, state, h_chunks[1]);
    draw_pagination(f, state, v_chunks[2]);
    draw_footer(f, state, v_chunks[3]);

    if state.screen.lookup.dialog().is_open() {
        draw_user_dialog(f, state);
    }
}

fn draw_header(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let searching = state.mode == InputMode::Searching;
    let (search_text, search_style) = if searching {
        (state.input_buffer.clone(), Style::default().fg(Color::Yellow))
    } else if state.screen.list.search().is_empty() {
        (
            "Search events...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (state.screen.list.search().to_string(), Style::default())
    };
    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Events [/] ")
            .border_style(if searching {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );
    f.render_widget(search, chunks[0]);

    if searching {
        let cursor_x = chunks[0].x + 1 + state.cursor_position as u16;
        f.set_cursor_position((cursor_x, chunks[0].y + 1));
    }

    let sort = Paragraph::new(state.screen.list.sort().label())
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sort [s] | Menu [M] "),
        );
    f.render_widget(sort, chunks[1]);
}

fn draw_sidebar(f: &mut Frame, state: &AppState, area: Rect) {
    let collapsed = area.width < 10;
    let items: Vec<ListItem> = NAV_ITEMS
        .iter()
        .map(|(short, name)| {
            let text = if collapsed {
                short.to_string()
            } else {
                name.to_string()
            };
            let style = if *name == "Events" {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::from(Span::styled(text, style)))
        })
        .collect();

    let title = if collapsed { "" } else { " Admin [b] " };
    let menu_open = state.screen.layout().current().mobile_menu_open;
    let sidebar = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if menu_open {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );
    f.render_widget(sidebar, area);
}

fn status_color(status: &DeliveryStatus) -> Color {
    match status {
        DeliveryStatus::Pending => Color::Yellow,
        DeliveryStatus::Processing => Color::Blue,
        DeliveryStatus::InTransit => Color::Magenta,
        DeliveryStatus::Delivered => Color::Green,
        DeliveryStatus::Cancelled => Color::Red,
        DeliveryStatus::OnHold => Color::LightRed,
        DeliveryStatus::Other(_) => Color::Gray,
    }
}

fn draw_events(f: &mut Frame, state: &mut AppState, area: Rect) {
    let list = &state.screen.list;
    let block = Block::default().borders(Borders::ALL).title(" Events ");

    if let Some(err) = list.error() {
        let text = vec![
            Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press [r] to retry."),
        ];
        let panel = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(panel, area);
        return;
    }

    if list.events().is_empty() {
        let text = if list.is_loading() {
            "Loading events..."
        } else {
            "No events found."
        };
        let panel = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(panel, area);
        return;
    }

    let updating = state.screen.edits.is_updating();
    let rows: Vec<Row> = list
        .events()
        .iter()
        .map(|ev| {
            let committed = &ev.delivery_status;
            let staged = state.screen.edits.staged(&ev.event_id, committed);
            let mut status_spans = vec![Span::styled(
                committed.label().to_string(),
                Style::default().fg(status_color(committed)),
            )];
            if state.screen.edits.show_confirm(&ev.event_id) {
                let confirm_style = if updating {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                };
                status_spans.push(Span::raw(" -> "));
                status_spans.push(Span::styled(
                    staged.label().to_string(),
                    Style::default().fg(status_color(staged)),
                ));
                status_spans.push(Span::styled(" [Enter: update]", confirm_style));
            }

            let location = ev.location.clone().unwrap_or_default();
            Row::new(vec![
                Cell::from(ev.event_name.clone()),
                Cell::from(ev.event_author.clone()),
                Cell::from(ev.start_date.format("%Y-%m-%d").to_string()),
                Cell::from(ev.created_at.format("%Y-%m-%d %H:%M").to_string()),
                Cell::from(location),
                Cell::from(Line::from(status_spans)),
            ])
        })
        .collect();

    let header = Row::new(vec!["Name", "Author", "Start", "Created", "Location", "Delivery"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Percentage(22),
        Constraint::Percentage(20),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Percentage(12),
        Constraint::Min(20),
    ];
    let title = if updating {
        " Events (updating...) "
    } else {
        " Events "
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(table, area, &mut state.table_state);
}

fn draw_pagination(f: &mut Frame, state: &AppState, area: Rect) {
    let list = &state.screen.list;
    let Some(info) = list.pagination() else {
        f.render_widget(Block::default().borders(Borders::ALL), area);
        return;
    };

    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        "< Prev ",
        if info.has_previous { enabled } else { disabled },
    )];
    for (slot, page) in list.page_window().enumerate() {
        let label = format!(" {}:{} ", slot + 1, page);
        let style = if page == info.current_page {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            enabled
        };
        spans.push(Span::styled(label, style));
    }
    spans.push(Span::styled(
        " Next >",
        if info.has_next { enabled } else { disabled },
    ));
    spans.push(Span::styled(
        format!(
            "   Page {} of {} ({} events)",
            info.current_page, info.total_pages, info.total_count
        ),
        disabled,
    ));

    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Pages "));
    f.render_widget(bar, area);
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (text, color) = match state.screen.notices.latest() {
        Some(t) => (
            t.text.clone(),
            match t.kind {
                ToastKind::Success => Color::Green,
                ToastKind::Error => Color::Red,
                ToastKind::Info => Color::Cyan,
            },
        ),
        None => (state.message.clone(), Color::Cyan),
    };
    let status = Paragraph::new(text).style(Style::default().fg(color)).block(
        Block::default()
            .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
            .title(" Status "),
    );

    let help_str = if state.screen.lookup.dialog().is_open() {
        "m:Email | c:Call | Esc:Close"
    } else if state.mode == InputMode::Searching {
        "Enter:Done | Esc:Clear"
    } else {
        "/:Search | s:Sort | [ ]:Status | Enter:Update | i:User | n/p:Page | r:Refresh | q:Quit"
    };
    let help = Paragraph::new(help_str)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);
}

fn draw_user_dialog(f: &mut Frame, state: &AppState) {
    let area = centered_rect(50, 40, f.area());
    let lines: Vec<Line> = match state.screen.lookup.dialog() {
        UserInfoDialog::Closed => return,
        UserInfoDialog::Loading { email } => vec![Line::from(format!("Looking up {}...", email))],
        UserInfoDialog::Error(msg) => vec![Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::Red),
        ))],
        UserInfoDialog::Loaded(profile) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    profile.full_name(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("Email: {}", profile.email)),
            ];
            if let Some(phone) = &profile.phone_number {
                lines.push(Line::from(format!("Phone: {}", phone)));
            }
            if let Some(kind) = &profile.user_type {
                lines.push(Line::from(format!("Type:  {}", kind)));
            }
            lines.push(Line::from(""));
            let actions: Vec<String> = state
                .screen
                .lookup
                .contact_actions()
                .iter()
                .map(|a| match a.label {
                    "Call" => format!("[c] {}", a.label),
                    _ => format!("[m] {}", a.label),
                })
                .collect();
            lines.push(Line::from(actions.join("   ")));
            lines
        }
    };

    let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" User Information ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// Helper function to create a centered rect using up certain percentages of the available rect.
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
