//! Console screen view.

use botdesk_core::api::{BotStatus, Presence};
use botdesk_core::directory::DataSource;
use botdesk_core::transcript::{EntryKind, LogEntry, PanelMode, TargetKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};

use crate::common::{truncate_start_with_ellipsis, truncate_with_ellipsis};
use crate::render::Palette;
use crate::state::{ConsoleFocus, TuiState};

const SIDEBAR_WIDTH: u16 = 34;
const COMPOSER_HEIGHT: u16 = 3;

pub fn hints(state: &TuiState) -> &'static [(&'static str, &'static str)] {
    match state.console.focus {
        ConsoleFocus::Bots => &[
            ("Enter", "activate"),
            ("s/S/X", "start·stop"),
            ("n/r/d", "new·rename·delete"),
            ("t", "token"),
            ("R", "refresh"),
            ("Tab", "focus"),
        ],
        ConsoleFocus::Targets => &[
            ("Enter", "open thread"),
            ("←/→", "groups·friends"),
            ("Esc", "back to feed"),
            ("Tab", "focus"),
        ],
        ConsoleFocus::Composer => &[
            ("Enter", "send"),
            ("^R", "command"),
            ("^B", "send to all"),
            ("Esc", "back"),
        ],
    }
}

pub fn render(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(area);
    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(cols[0]);
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(COMPOSER_HEIGHT)])
        .split(cols[1]);

    render_bots(state, palette, frame, sidebar[0]);
    render_targets(state, palette, frame, sidebar[1]);
    render_transcript(state, palette, frame, main[0]);
    render_composer(state, palette, frame, main[1]);
}

fn render_bots(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let focused = state.console.focus == ConsoleFocus::Bots;
    let source = match state.directory.source() {
        DataSource::Sample => "sample",
        DataSource::Server => "server",
    };
    let title = format!(
        " Bots {}/{} online · {source} ",
        state.directory.online_bots(),
        state.directory.bots().len()
    );
    let width = area.width.saturating_sub(6) as usize;
    let active = state.directory.active_bot_id();

    let items: Vec<ListItem> = state
        .directory
        .bots()
        .iter()
        .map(|bot| {
            let dot_color = match bot.status {
                BotStatus::Online => palette.success,
                BotStatus::Offline => palette.muted,
            };
            let marker = if active == Some(bot.id.as_str()) { "★ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(dot_color)),
                Span::raw(marker),
                Span::styled(
                    truncate_with_ellipsis(&bot.name, width.saturating_sub(4)),
                    Style::default().fg(palette.text),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(palette.block(title, focused))
        .highlight_style(if focused {
            palette.selected()
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        });
    let mut list_state = ListState::default();
    list_state.select(Some(state.console.bot_cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_targets(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let focused = state.console.focus == ConsoleFocus::Targets;
    let tab = state.console.target_tab;
    let tab_span = |kind: TargetKind, label: &'static str| {
        if kind == tab {
            Span::styled(
                label,
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(palette.muted))
        }
    };
    let title = Line::from(vec![
        Span::raw(" "),
        tab_span(TargetKind::Group, "Groups"),
        Span::styled(" │ ", Style::default().fg(palette.muted)),
        tab_span(TargetKind::Friend, "Friends"),
        Span::raw(" "),
    ]);

    let active_id = state.panel.active_target().map(|t| t.id.as_str());
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = match tab {
        TargetKind::Group => state
            .directory
            .groups()
            .iter()
            .map(|g| {
                target_item(
                    palette,
                    &g.name,
                    format!("{}/{}", g.online, g.members),
                    active_id == Some(g.id.as_str()),
                    width,
                )
            })
            .collect(),
        TargetKind::Friend => state
            .directory
            .friends()
            .iter()
            .map(|f| {
                let status = match f.status {
                    Presence::Online => "●",
                    Presence::Away => "◐",
                    Presence::Offline => "○",
                };
                target_item(
                    palette,
                    &f.name,
                    status.to_string(),
                    active_id == Some(f.id.as_str()),
                    width,
                )
            })
            .collect(),
    };

    let list = List::new(items)
        .block(palette.block(title, focused))
        .highlight_style(if focused {
            palette.selected()
        } else {
            Style::default()
        });
    let mut list_state = ListState::default();
    list_state.select(Some(state.console.target_cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn target_item(
    palette: &Palette,
    name: &str,
    detail: String,
    open: bool,
    width: usize,
) -> ListItem<'static> {
    let marker = if open { "▶ " } else { "  " };
    let name_width = width.saturating_sub(detail.chars().count() + 3);
    ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(palette.accent)),
        Span::styled(
            format!("{:<name_width$}", truncate_with_ellipsis(name, name_width)),
            Style::default().fg(palette.text),
        ),
        Span::styled(format!(" {detail}"), Style::default().fg(palette.muted)),
    ]))
}

fn render_transcript(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let title = match (state.panel.mode(), state.panel.active_target()) {
        (PanelMode::Thread, Some(target)) => format!(" 💬 {} ", target.display_name),
        _ => format!(" Activity · {} events ", state.panel.global_count()),
    };
    let block = palette.block(title, false);
    let inner_height = area.height.saturating_sub(2) as usize;

    let entries: Vec<&LogEntry> = state.panel.visible().collect();
    // Feed is newest-first from the top; threads read oldest-first and stick to the bottom.
    let shown: Vec<&LogEntry> = match state.panel.mode() {
        PanelMode::Global => entries.into_iter().take(inner_height).collect(),
        PanelMode::Thread => {
            let skip = entries.len().saturating_sub(inner_height);
            entries.into_iter().skip(skip).collect()
        }
    };

    let lines: Vec<Line> = if shown.is_empty() {
        vec![Line::from(Span::styled(
            "No activity yet",
            Style::default().fg(palette.muted),
        ))]
    } else {
        shown.into_iter().map(|e| entry_line(e, palette)).collect()
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn entry_line(entry: &LogEntry, palette: &Palette) -> Line<'static> {
    let time = entry.timestamp().format("%H:%M:%S").to_string();
    let color = match entry.kind() {
        EntryKind::Event => palette.warning,
        EntryKind::IncomingMessage => palette.text,
        EntryKind::OutgoingMessage => palette.accent,
    };
    Line::from(vec![
        Span::styled(format!("{time} "), Style::default().fg(palette.muted)),
        Span::styled(entry.rendered(), Style::default().fg(color)),
    ])
}

fn render_composer(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let focused = state.console.focus == ConsoleFocus::Composer;
    let placeholder = if state.panel.is_thread() {
        "Type a message..."
    } else {
        "Type a command or a message for everyone..."
    };
    let width = area.width.saturating_sub(4) as usize;

    let mut spans = Vec::new();
    if state.console.composer.is_empty() {
        if focused {
            spans.push(Span::styled("█", Style::default().fg(palette.accent)));
        }
        spans.push(Span::styled(placeholder, Style::default().fg(palette.muted)));
    } else {
        spans.push(Span::styled(
            truncate_start_with_ellipsis(&state.console.composer, width),
            Style::default().fg(palette.text),
        ));
        if focused {
            spans.push(Span::styled("█", Style::default().fg(palette.accent)));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(palette.block(" Message ", focused)),
        area,
    );
}
