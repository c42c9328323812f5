//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use botdesk_core::config::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};

use crate::features::{console, payment, rental, shop};
use crate::overlays::OverlayExt;
use crate::state::{AppState, AuthStatus, NoticeLevel, Screen, TuiState};

const HEADER_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;

/// Spinner frames for running tasks.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Colors for the active theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                border: Color::Gray,
                success: Color::Green,
                warning: Color::Yellow,
                error: Color::Red,
                selected_fg: Color::Black,
                selected_bg: Color::Cyan,
            },
            Theme::Light => Self {
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                border: Color::DarkGray,
                success: Color::Green,
                warning: Color::Magenta,
                error: Color::Red,
                selected_fg: Color::White,
                selected_bg: Color::Blue,
            },
        }
    }

    pub fn block<'a>(&self, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
        let border = if focused { self.accent } else { self.border };
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(title.into())
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }
}

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let state = &app.tui;
    let palette = Palette::for_theme(state.theme);
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    render_header(state, &palette, frame, chunks[0]);
    match state.screen {
        Screen::Console => console::render(state, &palette, frame, chunks[1]),
        Screen::Shop => shop::render(state, &palette, frame, chunks[1]),
        Screen::Rental => rental::render(state, &palette, frame, chunks[1]),
        Screen::Payment => payment::render(state, &palette, frame, chunks[1]),
    }
    render_status_line(state, &palette, frame, chunks[2]);

    app.overlay.render(frame, chunks[1], &state.tasks);
}

fn render_header(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(36)])
        .split(area);

    let titles: Vec<Line> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, screen)| Line::from(format!("F{} {}", i + 1, screen.title())))
        .collect();
    let selected = Screen::ALL
        .iter()
        .position(|s| *s == state.screen)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(palette.muted))
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("│", Style::default().fg(palette.muted)));
    frame.render_widget(tabs, cols[0]);

    let (who, color) = match &state.auth {
        AuthStatus::LoggedIn(user) => (format!("● {}", user.username), palette.success),
        AuthStatus::LoggedOut => ("○ offline (sample data)".to_string(), palette.muted),
        AuthStatus::Unknown => ("… checking session".to_string(), palette.muted),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(who, Style::default().fg(color))))
            .alignment(Alignment::Right),
        cols[1],
    );
}

fn render_status_line(state: &TuiState, palette: &Palette, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    if state.tasks.is_any_running() {
        let spinner = SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()];
        spans.push(Span::styled(
            format!("{spinner} "),
            Style::default().fg(palette.accent),
        ));
    }

    if let Some(notice) = &state.notice {
        let color = match notice.level {
            NoticeLevel::Info => palette.accent,
            NoticeLevel::Success => palette.success,
            NoticeLevel::Error => palette.error,
        };
        spans.push(Span::styled(notice.text.clone(), Style::default().fg(color)));
    } else {
        let hints = match state.screen {
            Screen::Console => console::hints(state),
            Screen::Shop => shop::HINTS,
            Screen::Rental => rental::HINTS,
            Screen::Payment => payment::HINTS,
        };
        spans.extend(hint_spans(hints, palette));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn hint_spans(hints: &[(&'static str, &'static str)], palette: &Palette) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, (key, action)) in hints
        .iter()
        .chain(GLOBAL_HINTS.iter())
        .enumerate()
    {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(palette.muted)));
        }
        spans.push(Span::styled(*key, Style::default().fg(palette.accent)));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(palette.muted),
        ));
    }
    spans
}

const GLOBAL_HINTS: &[(&str, &str)] = &[
    ("^L", "login"),
    ("^T", "theme"),
    ("^Q", "quit"),
];
