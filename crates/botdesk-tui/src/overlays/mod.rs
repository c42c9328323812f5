//! Overlay modules for the TUI.
//!
//! Overlays are modal UI components that temporarily take over keyboard input.
//! Each overlay owns its state, key handler and render function.
//!
//! - `confirm.rs`: yes/no prompt (payment cancel, bot delete, purchase)
//! - `login.rs`: username/password sign-in
//! - `bot_form.rs`: create and rename bot
//! - `token.rs`: masked bot token viewer
//! - `render_utils.rs`: shared popup rendering helpers

pub mod bot_form;
pub mod confirm;
pub mod login;
pub mod render_utils;
pub mod token;

use botdesk_core::payment::CancelGate;
pub use bot_form::{BotFormMode, BotFormState};
pub use confirm::{ConfirmAction, ConfirmState};
use crossterm::event::KeyEvent;
pub use login::LoginState;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use token::TokenState;

use crate::common::Tasks;
use crate::effects::UiEffect;
use crate::mutations::StateMutation;
use crate::state::TuiState;

/// Requests to open an overlay, raised by feature key handlers.
#[derive(Debug)]
pub enum OverlayRequest {
    Login,
    CreateBot,
    RenameBot { bot_id: String, name: String },
    DeleteBot { bot_id: String, name: String },
    Token { bot_id: String, name: String },
    Purchase { summary: String },
    CancelPayment(CancelGate),
}

/// Transition returned by overlay key handlers.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub mutations: Vec<StateMutation>,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            mutations: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    #[must_use]
    pub fn with_mutations(mut self, mutations: Vec<StateMutation>) -> Self {
        self.mutations = mutations;
        self
    }

    #[must_use]
    pub fn with_ui_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    Confirm(ConfirmState),
    Login(LoginState),
    BotForm(BotFormState),
    Token(TokenState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect, tasks: &Tasks) {
        match self {
            Overlay::Confirm(c) => c.render(frame, area),
            Overlay::Login(l) => l.render(frame, area, tasks.login.is_running()),
            Overlay::BotForm(f) => f.render(frame, area),
            Overlay::Token(t) => t.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::Confirm(c) => c.handle_key(key),
            Overlay::Login(l) => l.handle_key(tui, key),
            Overlay::BotForm(f) => f.handle_key(tui, key),
            Overlay::Token(t) => t.handle_key(key),
        }
    }
}

/// Extension trait for `Option<Overlay>` used by the reducer and renderer.
pub trait OverlayExt {
    fn render(&self, frame: &mut Frame, area: Rect, tasks: &Tasks);

    /// Routes a key to the active overlay. `None` when no overlay is open.
    fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> Option<OverlayUpdate>;
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect, tasks: &Tasks) {
        if let Some(overlay) = self {
            overlay.render(frame, area, tasks);
        }
    }

    fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> Option<OverlayUpdate> {
        self.as_mut().map(|overlay| overlay.handle_key(tui, key))
    }
}
