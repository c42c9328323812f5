//! Yes/no confirmation prompt.

use botdesk_core::payment::CancelGate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_message, render_overlay};
use crate::effects::UiEffect;
use crate::mutations::{PaymentMutation, ShopMutation, StateMutation};

/// What happens when the operator answers yes.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    CancelPayment(CancelGate),
    DeleteBot { bot_id: String, name: String },
    Purchase,
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub title: String,
    pub message: String,
    pub action: ConfirmAction,
}

impl ConfirmState {
    pub fn cancel_payment(gate: CancelGate) -> Self {
        Self {
            title: "Cancel Payment".to_string(),
            message: "Are you sure you want to cancel this payment?".to_string(),
            action: ConfirmAction::CancelPayment(gate),
        }
    }

    pub fn delete_bot(bot_id: String, name: String) -> Self {
        Self {
            title: "Delete Bot".to_string(),
            message: format!("Delete bot \"{name}\"? This cannot be undone."),
            action: ConfirmAction::DeleteBot { bot_id, name },
        }
    }

    pub fn purchase(summary: String) -> Self {
        Self {
            title: "Purchase".to_string(),
            message: summary,
            action: ConfirmAction::Purchase,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let hints = [
            InputHint::new("y/Enter", "yes"),
            InputHint::new("n/Esc", "no"),
        ];
        let body_lines = u16::try_from(self.message.lines().count()).unwrap_or(u16::MAX);
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: &self.title,
                border_color: Color::Yellow,
                width: 56,
                height: body_lines.saturating_add(4),
                hints: &hints,
            },
        );
        render_message(frame, layout.body, &self.message, Color::Reset);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Esc | KeyCode::Char('n' | 'N') => OverlayUpdate::close(),
            KeyCode::Enter | KeyCode::Char('y' | 'Y') => self.accept(),
            _ => OverlayUpdate::stay(),
        }
    }

    fn accept(&self) -> OverlayUpdate {
        match &self.action {
            ConfirmAction::CancelPayment(gate) => OverlayUpdate::close().with_mutations(vec![
                StateMutation::Payment(PaymentMutation::ConfirmCancel(*gate)),
            ]),
            ConfirmAction::DeleteBot { bot_id, .. } => {
                OverlayUpdate::close().with_ui_effects(vec![UiEffect::DeleteBot {
                    task: None,
                    bot_id: bot_id.clone(),
                }])
            }
            ConfirmAction::Purchase => OverlayUpdate::close()
                .with_mutations(vec![StateMutation::Shop(ShopMutation::PurchaseConfirmed)]),
        }
    }
}
