use botdesk_core::payment::RentalOrder;
use botdesk_core::pricing::{self, RentalTier};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::effects::UiEffect;
use crate::features::KeyOutcome;
use crate::state::{Notice, RentalField, Screen, TuiState};

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            tui.rental.field = tui.rental.field.next();
            KeyOutcome::none()
        }
        KeyCode::BackTab | KeyCode::Up => {
            tui.rental.field = tui.rental.field.prev();
            KeyOutcome::none()
        }
        KeyCode::Left | KeyCode::Right if tui.rental.field == RentalField::Tier => {
            step_preset(tui, key.code == KeyCode::Right);
            KeyOutcome::none()
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if tui.rental.field == RentalField::Method => {
            tui.rental.method = tui.rental.method.next();
            KeyOutcome::none()
        }
        KeyCode::Enter if tui.rental.field == RentalField::CustomDays => {
            apply_custom_days(tui);
            KeyOutcome::none()
        }
        KeyCode::Enter => start_checkout(tui),
        KeyCode::Backspace => {
            if let Some(text) = active_text(tui) {
                text.pop();
            }
            KeyOutcome::none()
        }
        KeyCode::Char(c) if !ctrl => {
            if let Some(text) = active_text(tui) {
                text.push(c);
            }
            KeyOutcome::none()
        }
        _ => KeyOutcome::none(),
    }
}

fn active_text(tui: &mut TuiState) -> Option<&mut String> {
    let form = &mut tui.rental;
    match form.field {
        RentalField::CustomDays => Some(&mut form.custom_days),
        RentalField::Prefix => Some(&mut form.prefix),
        RentalField::Email => Some(&mut form.email),
        RentalField::Tier | RentalField::Method => None,
    }
}

fn step_preset(tui: &mut TuiState, forward: bool) {
    let presets = pricing::preset_tiers();
    if presets.is_empty() {
        return;
    }
    let next = match (tui.rental.preset_index(), forward) {
        (Some(i), true) => (i + 1).min(presets.len() - 1),
        (Some(i), false) => i.saturating_sub(1),
        (None, _) => 0,
    };
    tui.rental.tier = presets[next];
    tui.rental.custom_days.clear();
}

/// Invalid input leaves the current tier in place.
fn apply_custom_days(tui: &mut TuiState) {
    match pricing::parse_days(&tui.rental.custom_days) {
        Ok(days) => {
            tui.rental.tier = RentalTier::for_days(days);
            tui.notify(Notice::info(format!(
                "{days}: {}",
                pricing::format_vnd(tui.rental.tier.total_price())
            )));
        }
        Err(err) => tui.notify(Notice::error(err.to_string())),
    }
}

fn start_checkout(tui: &mut TuiState) -> KeyOutcome {
    let form = &tui.rental;
    match RentalOrder::new(form.tier, form.method, &form.prefix, &form.email) {
        Ok(order) => {
            let session = tui.checkout.open(order);
            tui.screen = Screen::Payment;
            KeyOutcome::effect(UiEffect::StartCountdown { session })
        }
        Err(err) => {
            tui.notify(Notice::error(err.to_string()));
            KeyOutcome::none()
        }
    }
}
