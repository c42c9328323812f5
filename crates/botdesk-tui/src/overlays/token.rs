//! Bot token viewer. The token stays masked until revealed.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::OverlayUpdate;
use super::render_utils::{
    InputHint, OverlayConfig, render_message, render_overlay, render_status_row,
};
use crate::common::mask_secret;

#[derive(Debug, Clone)]
pub struct TokenState {
    pub bot_id: String,
    pub bot_name: String,
    /// `None` while the fetch is in flight.
    pub token: Option<String>,
    pub error: Option<String>,
    pub revealed: bool,
}

impl TokenState {
    pub fn open(bot_id: String, bot_name: String, cached: Option<String>) -> Self {
        Self {
            bot_id,
            bot_name,
            token: cached,
            error: None,
            revealed: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Char('r' | ' ') => {
                self.revealed = !self.revealed;
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn display_token(&self) -> Option<String> {
        self.token.as_deref().map(|token| {
            if self.revealed {
                token.to_string()
            } else {
                mask_secret(token)
            }
        })
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let reveal_action = if self.revealed { "hide" } else { "reveal" };
        let hints = [
            InputHint::new("r", reveal_action),
            InputHint::new("Esc", "close"),
        ];
        let title = format!("Token: {}", self.bot_name);
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: &title,
                border_color: Color::Magenta,
                width: 64,
                height: 6,
                hints: &hints,
            },
        );

        match self.display_token() {
            Some(token) => render_message(frame, layout.body, &token, Color::Reset),
            None => render_status_row(frame, layout.body, 0, self.error.as_deref(), "Loading..."),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState};

    use super::*;

    #[test]
    fn test_reveal_toggle() {
        let mut state = TokenState::open(
            "b1".to_string(),
            "Main".to_string(),
            Some("abcd1234wxyz".to_string()),
        );
        assert_eq!(state.display_token().as_deref(), Some("abcd••••wxyz"));
        state.handle_key(KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
        assert_eq!(state.display_token().as_deref(), Some("abcd1234wxyz"));
    }
}
