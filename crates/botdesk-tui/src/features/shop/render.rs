use botdesk_core::pricing::format_vnd;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};

use crate::render::Palette;
use crate::state::TuiState;

pub const HINTS: &[(&str, &str)] = &[("Enter", "select"), ("b", "buy"), ("F1", "console")];

pub fn render(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let items: Vec<ListItem> = state
        .cart
        .catalog()
        .iter()
        .map(|item| {
            let owned = state.cart.is_selected(item.id);
            let check = if owned { "✓" } else { " " };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("[{check}] "), Style::default().fg(palette.success)),
                    Span::raw(format!("{} ", item.icon)),
                    Span::styled(
                        item.name,
                        Style::default()
                            .fg(palette.text)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", format_vnd(item.price)),
                        Style::default().fg(palette.warning),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("      {}", item.description),
                    Style::default().fg(palette.muted),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(palette.block(" Commands ", true))
        .highlight_style(palette.selected());
    let mut list_state = ListState::default();
    list_state.select(Some(state.shop_cursor));
    frame.render_stateful_widget(list, cols[0], &mut list_state);

    render_cart(state, palette, frame, cols[1]);
}

fn render_cart(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = state
        .cart
        .catalog()
        .iter()
        .filter(|item| state.cart.is_selected(item.id))
        .map(|item| {
            Line::from(vec![
                Span::styled(format!("• {}", item.name), Style::default().fg(palette.text)),
                Span::styled(
                    format!("  {}", format_vnd(item.price)),
                    Style::default().fg(palette.muted),
                ),
            ])
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing selected yet",
            Style::default().fg(palette.muted),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Total: ", Style::default().fg(palette.text)),
        Span::styled(
            format_vnd(state.cart.total()),
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    let title = format!(" Cart ({}) ", state.cart.count());
    frame.render_widget(
        Paragraph::new(lines)
            .block(palette.block(title, false))
            .wrap(Wrap { trim: false }),
        area,
    );
}
