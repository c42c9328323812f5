//! Username/password sign-in against the bot manager.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::OverlayUpdate;
use super::render_utils::{
    InputHint, InputLine, OverlayConfig, render_input_line, render_overlay, render_separator,
    render_status_row,
};
use crate::effects::UiEffect;
use crate::state::TuiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub field: LoginField,
    pub error: Option<String>,
}

impl LoginState {
    pub fn open() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            field: LoginField::Username,
            error: None,
        }
    }

    /// Called by the reducer when the server rejected the credentials.
    pub fn fail(&mut self, message: String) {
        self.password.clear();
        self.field = LoginField::Password;
        self.error = Some(message);
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('c') if key.code == KeyCode::Esc || ctrl => {
                OverlayUpdate::close()
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.field = match self.field {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
                OverlayUpdate::stay()
            }
            KeyCode::Enter if self.field == LoginField::Username => {
                self.field = LoginField::Password;
                OverlayUpdate::stay()
            }
            KeyCode::Enter => self.submit(tui),
            KeyCode::Backspace => {
                self.active_mut().pop();
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if !ctrl => {
                self.active_mut().push(c);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    fn submit(&mut self, tui: &TuiState) -> OverlayUpdate {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            self.error = Some("Please enter username and password".to_string());
            return OverlayUpdate::stay();
        }
        if tui.tasks.login.is_running() {
            self.error = Some("Signing in...".to_string());
            return OverlayUpdate::stay();
        }
        // Stays open until the reducer sees the login result.
        OverlayUpdate::stay().with_ui_effects(vec![UiEffect::Login {
            task: None,
            username: username.to_string(),
            password: self.password.clone(),
        }])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, signing_in: bool) {
        let hints = [
            InputHint::new("Tab", "switch field"),
            InputHint::new("Enter", "sign in"),
            InputHint::new("Esc", "cancel"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Sign In",
                border_color: Color::Cyan,
                width: 52,
                height: 8,
                hints: &hints,
            },
        );
        let body = layout.body;

        render_input_line(
            frame,
            Rect::new(body.x, body.y, body.width, 1),
            &InputLine {
                label: "Username",
                value: &self.username,
                placeholder: None,
                focused: self.field == LoginField::Username,
                accent: Color::Cyan,
            },
        );
        let masked = "•".repeat(self.password.chars().count());
        render_input_line(
            frame,
            Rect::new(body.x, body.y + 1, body.width, 1),
            &InputLine {
                label: "Password",
                value: &masked,
                placeholder: None,
                focused: self.field == LoginField::Password,
                accent: Color::Cyan,
            },
        );
        render_separator(frame, body, 2);

        let help = if signing_in {
            "Signing in..."
        } else {
            "Sign in to manage your bots"
        };
        render_status_row(frame, body, 3, self.error.as_deref(), help);
    }
}

#[cfg(test)]
mod tests {
    use botdesk_core::config::Config;
    use crossterm::event::{KeyEventKind, KeyEventState};

    use super::*;
    use crate::overlays::OverlayTransition;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(state: &mut LoginState, tui: &TuiState, text: &str) {
        for c in text.chars() {
            state.handle_key(tui, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_submit_requires_both_fields() {
        let tui = TuiState::new(Config::default());
        let mut state = LoginState::open();
        type_text(&mut state, &tui, "admin");
        state.handle_key(&tui, key(KeyCode::Enter));
        assert_eq!(state.field, LoginField::Password);

        let update = state.handle_key(&tui, key(KeyCode::Enter));
        assert!(update.effects.is_empty());
        assert!(state.error.is_some());
    }

    #[test]
    fn test_submit_emits_login_and_stays_open() {
        let tui = TuiState::new(Config::default());
        let mut state = LoginState::open();
        type_text(&mut state, &tui, "admin");
        state.handle_key(&tui, key(KeyCode::Tab));
        type_text(&mut state, &tui, "secret");

        let update = state.handle_key(&tui, key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Stay));
        assert!(matches!(
            update.effects.as_slice(),
            [UiEffect::Login { username, password, .. }] if username == "admin" && password == "secret"
        ));
    }

    #[test]
    fn test_fail_clears_password() {
        let mut state = LoginState::open();
        state.password = "wrong".to_string();
        state.fail("Invalid credentials".to_string());
        assert!(state.password.is_empty());
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    }
}
