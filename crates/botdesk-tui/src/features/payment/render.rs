use botdesk_core::payment::{SessionState, format_remaining};
use botdesk_core::pricing::format_vnd;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::render::Palette;
use crate::state::TuiState;

pub const HINTS: &[(&str, &str)] = &[("y/Enter", "I have paid"), ("c/Esc", "cancel")];

/// Below this many seconds the countdown turns to the warning color.
const LOW_TIME_SECS: u32 = 60;

pub fn render(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let block = palette.block(" Payment ", true);
    let Some(session) = state.checkout.session() else {
        frame.render_widget(
            Paragraph::new("No payment in progress. Choose a plan on the Rental screen (F3).")
                .style(Style::default().fg(palette.muted))
                .block(block),
            area,
        );
        return;
    };

    let order = session.order();
    let label = |text: &'static str| Span::styled(text, Style::default().fg(palette.muted));
    let value = |text: String| Span::styled(text, Style::default().fg(palette.text));

    let remaining = session.remaining_secs();
    let (status_text, status_color) = match session.state() {
        SessionState::Active if session.is_settling() => {
            ("Processing payment...".to_string(), palette.accent)
        }
        SessionState::Active => {
            let color = if remaining <= LOW_TIME_SECS {
                palette.error
            } else {
                palette.warning
            };
            (format!("⏱ {}", format_remaining(remaining)), color)
        }
        SessionState::Confirmed => ("✅ Payment confirmed".to_string(), palette.success),
        SessionState::Cancelled => ("Payment cancelled".to_string(), palette.muted),
        SessionState::Expired => ("Payment window expired".to_string(), palette.error),
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            status_text,
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            label("Amount: "),
            Span::styled(
                format_vnd(order.amount()),
                Style::default()
                    .fg(palette.warning)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            label("Plan: "),
            value(format!(
                "{} × {}/day",
                order.tier.days,
                format_vnd(order.tier.price_per_day)
            )),
        ]),
        Line::from(vec![label("Method: "), value(order.method.display_name().to_string())]),
        Line::from(vec![label("Bot prefix: "), value(order.prefix.clone())]),
        Line::from(vec![label("Email: "), value(order.email.clone())]),
        Line::from(vec![
            label("Reference: "),
            value(format!("{} {}", session.id(), session.reference())),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}
