use botdesk_core::payment::PaymentMethod;
use botdesk_core::pricing::{self, format_vnd};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::overlays::render_utils::{InputLine, render_input_line};
use crate::render::Palette;
use crate::state::{RentalField, TuiState};

pub const HINTS: &[(&str, &str)] = &[
    ("↑/↓", "field"),
    ("←/→", "change"),
    ("Enter", "checkout"),
];

const CARD_HEIGHT: u16 = 5;

pub fn render(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CARD_HEIGHT), Constraint::Min(8)])
        .split(area);

    render_cards(state, palette, frame, rows[0]);
    render_form(state, palette, frame, rows[1]);
}

fn render_cards(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let tiers = pricing::preset_tiers();
    let constraints: Vec<Constraint> = tiers
        .iter()
        .map(|_| Constraint::Ratio(1, u32::try_from(tiers.len()).unwrap_or(1)))
        .collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let tier_focused = state.rental.field == RentalField::Tier;
    let selected = state.rental.preset_index();
    for (i, tier) in tiers.iter().enumerate() {
        let is_selected = selected == Some(i);
        let lines = vec![
            Line::from(Span::styled(
                format_vnd(tier.total_price()),
                Style::default()
                    .fg(palette.warning)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{}/day", format_vnd(tier.price_per_day)),
                Style::default().fg(palette.muted),
            )),
        ];
        let block = palette
            .block(format!(" {} ", tier.days), is_selected && tier_focused)
            .border_style(if is_selected {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(palette.border)
            });
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            cells[i],
        );
    }
}

fn render_form(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let form = &state.rental;
    let block = palette.block(" Checkout ", form.field != RentalField::Tier);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let row = |offset: u16| Rect::new(inner.x, inner.y + offset, inner.width, 1);
    if inner.height < 7 {
        return;
    }

    render_input_line(
        frame,
        row(0),
        &InputLine {
            label: "Custom days",
            value: &form.custom_days,
            placeholder: Some("type a number and press Enter"),
            focused: form.field == RentalField::CustomDays,
            accent: palette.accent,
        },
    );

    let method_focused = form.field == RentalField::Method;
    let label_style = if method_focused {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted)
    };
    let mut method_spans = vec![Span::styled("Method: ", label_style)];
    for method in PaymentMethod::ALL {
        let style = if method == form.method {
            palette.selected()
        } else {
            Style::default().fg(palette.text)
        };
        method_spans.push(Span::styled(format!(" {} ", method.display_name()), style));
        method_spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(method_spans)), row(1));

    render_input_line(
        frame,
        row(2),
        &InputLine {
            label: "Bot prefix",
            value: &form.prefix,
            placeholder: Some("e.g. !"),
            focused: form.field == RentalField::Prefix,
            accent: palette.accent,
        },
    );
    render_input_line(
        frame,
        row(3),
        &InputLine {
            label: "Email",
            value: &form.email,
            placeholder: Some("you@example.com"),
            focused: form.field == RentalField::Email,
            accent: palette.accent,
        },
    );

    let summary = Line::from(vec![
        Span::styled(
            format!(
                "{} × {}/day = ",
                form.tier.days,
                format_vnd(form.tier.price_per_day)
            ),
            Style::default().fg(palette.text),
        ),
        Span::styled(
            format_vnd(form.tier.total_price()),
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  via {}", form.method.display_name()),
            Style::default().fg(palette.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(summary), row(5));
}
