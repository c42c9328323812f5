use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::common::truncate_start_with_ellipsis;

/// Centers a popup of at most `width` x `height` inside `area`.
pub fn calculate_overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_overlay_container(frame: &mut Frame, area: Rect, title: &str, border_color: Color) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);
}

pub struct OverlayConfig<'a> {
    pub title: &'a str,
    pub border_color: Color,
    pub width: u16,
    pub height: u16,
    pub hints: &'a [InputHint<'a>],
}

pub struct OverlayLayout {
    pub body: Rect,
}

/// Draws the popup frame and hint row, returning the free body area.
pub fn render_overlay(frame: &mut Frame, area: Rect, config: &OverlayConfig<'_>) -> OverlayLayout {
    let popup = calculate_overlay_area(area, config.width, config.height);
    render_overlay_container(frame, popup, config.title, config.border_color);

    let inner = Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    );

    if !config.hints.is_empty() {
        render_hints(frame, inner, config.hints, config.border_color);
    }

    let footer_height = u16::from(!config.hints.is_empty());
    let body = Rect::new(
        inner.x,
        inner.y,
        inner.width,
        inner.height.saturating_sub(footer_height),
    );
    OverlayLayout { body }
}

pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> InputHint<'a> {
    pub fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

/// A labelled single-line text field.
pub struct InputLine<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: Option<&'a str>,
    pub focused: bool,
    pub accent: Color,
}

/// Renders `label: text█`. The cursor block only shows on the focused field.
pub fn render_input_line(frame: &mut Frame, area: Rect, input: &InputLine<'_>) {
    let label = format!("{}: ", input.label);
    let max_text_width = (area.width as usize).saturating_sub(label.chars().count() + 1);
    let show_placeholder = input.value.is_empty() && input.placeholder.is_some();

    let label_style = if input.focused {
        Style::default()
            .fg(input.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut spans = vec![Span::styled(label, label_style)];

    if show_placeholder {
        if input.focused {
            spans.push(Span::styled("█", Style::default().fg(input.accent)));
        }
        spans.push(Span::styled(
            truncate_start_with_ellipsis(input.placeholder.unwrap_or_default(), max_text_width),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(truncate_start_with_ellipsis(
            input.value,
            max_text_width,
        )));
        if input.focused {
            spans.push(Span::styled("█", Style::default().fg(input.accent)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[InputHint], highlight_color: Color) {
    let hints_area = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);

    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(highlight_color)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        hints_area,
    );
}

pub fn render_separator(frame: &mut Frame, area: Rect, y_offset: u16) {
    if y_offset >= area.height {
        return;
    }
    let separator_area = Rect::new(area.x, area.y + y_offset, area.width, 1);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "─".repeat(area.width as usize),
            Style::default().fg(Color::DarkGray),
        ))),
        separator_area,
    );
}

/// Wrapped body text, one paragraph per `\n`.
pub fn render_message(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let lines: Vec<Line> = text
        .lines()
        .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(color))))
        .collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// A one-line error or help row.
pub fn render_status_row(frame: &mut Frame, area: Rect, y_offset: u16, error: Option<&str>, help: &str) {
    if y_offset >= area.height {
        return;
    }
    let (text, style) = match error {
        Some(error) => (error, Style::default().fg(Color::Red)),
        None => (help, Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text.to_string(), style))),
        Rect::new(area.x, area.y + y_offset, area.width, 1),
    );
}
