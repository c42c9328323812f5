//! Feature slices for the TUI (update/render per screen).

pub mod console;
pub mod payment;
pub mod rental;
pub mod shop;

use crate::effects::UiEffect;
use crate::overlays::OverlayRequest;

/// What a screen key handler asks the reducer to do next.
#[derive(Debug, Default)]
pub struct KeyOutcome {
    pub effects: Vec<UiEffect>,
    pub overlay: Option<OverlayRequest>,
}

impl KeyOutcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn effect(effect: UiEffect) -> Self {
        Self {
            effects: vec![effect],
            overlay: None,
        }
    }

    pub fn effects(effects: Vec<UiEffect>) -> Self {
        Self {
            effects,
            overlay: None,
        }
    }

    pub fn overlay(request: OverlayRequest) -> Self {
        Self {
            effects: Vec::new(),
            overlay: Some(request),
        }
    }
}
