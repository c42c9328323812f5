//! Create/rename bot overlay.

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

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotFormMode {
    Create,
    Rename { bot_id: String, current_name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotFormField {
    Name,
    Prefix,
}

#[derive(Debug, Clone)]
pub struct BotFormState {
    pub mode: BotFormMode,
    pub name: String,
    /// Command prefix; only asked for when creating.
    pub prefix: String,
    pub field: BotFormField,
    pub error: Option<String>,
}

impl BotFormState {
    pub fn create() -> Self {
        Self {
            mode: BotFormMode::Create,
            name: String::new(),
            prefix: String::new(),
            field: BotFormField::Name,
            error: None,
        }
    }

    pub fn rename(bot_id: String, current_name: String) -> Self {
        Self {
            mode: BotFormMode::Rename {
                bot_id,
                current_name,
            },
            ..Self::create()
        }
    }

    fn has_prefix_field(&self) -> bool {
        self.mode == BotFormMode::Create
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
            KeyCode::Tab | KeyCode::BackTab if self.has_prefix_field() => {
                self.field = match self.field {
                    BotFormField::Name => BotFormField::Prefix,
                    BotFormField::Prefix => BotFormField::Name,
                };
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

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            BotFormField::Name => &mut self.name,
            BotFormField::Prefix => &mut self.prefix,
        }
    }

    fn submit(&mut self, tui: &TuiState) -> OverlayUpdate {
        let name = self.name.trim();
        if name.is_empty() {
            self.error = Some("Please enter a bot name".to_string());
            return OverlayUpdate::stay();
        }
        match &self.mode {
            BotFormMode::Create => {
                if tui.tasks.bot_create.is_running() {
                    self.error = Some("Creating bot...".to_string());
                    return OverlayUpdate::stay();
                }
                let prefix = self.prefix.trim();
                OverlayUpdate::close().with_ui_effects(vec![UiEffect::CreateBot {
                    task: None,
                    name: name.to_string(),
                    prefix: (!prefix.is_empty()).then(|| prefix.to_string()),
                }])
            }
            BotFormMode::Rename { bot_id, .. } => {
                if tui.tasks.bot_rename.is_running() {
                    self.error = Some("Rename in progress...".to_string());
                    return OverlayUpdate::stay();
                }
                OverlayUpdate::close().with_ui_effects(vec![UiEffect::RenameBot {
                    task: None,
                    bot_id: bot_id.clone(),
                    name: name.to_string(),
                }])
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (title, height) = match self.mode {
            BotFormMode::Create => ("New Bot", 8),
            BotFormMode::Rename { .. } => ("Rename Bot", 7),
        };
        let hints = [
            InputHint::new("Enter", "save"),
            InputHint::new("Esc", "cancel"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title,
                border_color: Color::Yellow,
                width: 52,
                height,
                hints: &hints,
            },
        );
        let body = layout.body;

        let placeholder = match &self.mode {
            BotFormMode::Rename { current_name, .. } => Some(current_name.as_str()),
            BotFormMode::Create => Some("My bot"),
        };
        render_input_line(
            frame,
            Rect::new(body.x, body.y, body.width, 1),
            &InputLine {
                label: "Name",
                value: &self.name,
                placeholder,
                focused: self.field == BotFormField::Name,
                accent: Color::Yellow,
            },
        );

        let mut row = 1;
        if self.has_prefix_field() {
            render_input_line(
                frame,
                Rect::new(body.x, body.y + 1, body.width, 1),
                &InputLine {
                    label: "Prefix",
                    value: &self.prefix,
                    placeholder: Some("optional, e.g. !"),
                    focused: self.field == BotFormField::Prefix,
                    accent: Color::Yellow,
                },
            );
            row = 2;
        }
        render_separator(frame, body, row);
        render_status_row(
            frame,
            body,
            row + 1,
            self.error.as_deref(),
            "Type a name for this bot",
        );
    }
}
