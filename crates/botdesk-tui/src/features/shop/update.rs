use botdesk_core::cart::SelectOutcome;
use crossterm::event::{KeyCode, KeyEvent};

use crate::features::KeyOutcome;
use crate::overlays::OverlayRequest;
use crate::state::{Notice, TuiState};

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    let len = tui.cart.catalog().len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            tui.shop_cursor = tui.shop_cursor.saturating_sub(1);
            KeyOutcome::none()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if tui.shop_cursor + 1 < len {
                tui.shop_cursor += 1;
            }
            KeyOutcome::none()
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            select_at_cursor(tui);
            KeyOutcome::none()
        }
        KeyCode::Char('b') => match tui.cart.checkout_summary() {
            Ok(summary) => KeyOutcome::overlay(OverlayRequest::Purchase { summary }),
            Err(err) => {
                tui.notify(Notice::error(err.to_string()));
                KeyOutcome::none()
            }
        },
        _ => KeyOutcome::none(),
    }
}

fn select_at_cursor(tui: &mut TuiState) {
    let Some(item) = tui.cart.catalog().get(tui.shop_cursor).copied() else {
        return;
    };
    match tui.cart.select(item.id) {
        SelectOutcome::Selected => {
            tui.notify(Notice::success(format!("Added {} to cart", item.name)));
        }
        SelectOutcome::AlreadyOwned => {
            tui.notify(Notice::info("You already bought this command"));
        }
        SelectOutcome::Unknown => {}
    }
}

pub fn confirm_purchase(tui: &mut TuiState) {
    tracing::info!(items = tui.cart.count(), total = tui.cart.total(), "purchase confirmed");
    tui.notify(Notice::success("Purchase successful!"));
}

#[cfg(test)]
mod tests {
    use botdesk_core::config::Config;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;
    use crate::state::NoticeLevel;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_reselect_reports_already_owned() {
        let mut tui = TuiState::new(Config::default());
        handle_key(&mut tui, key(KeyCode::Enter));
        let total = tui.cart.total();
        handle_key(&mut tui, key(KeyCode::Enter));

        assert_eq!(tui.cart.total(), total);
        assert_eq!(tui.cart.count(), 1);
        let notice = tui.notice.as_ref().unwrap();
        assert_eq!(notice.text, "You already bought this command");
        assert_eq!(notice.level, NoticeLevel::Info);
    }

    #[test]
    fn test_buy_with_empty_cart_is_blocked() {
        let mut tui = TuiState::new(Config::default());
        let outcome = handle_key(&mut tui, key(KeyCode::Char('b')));
        assert!(outcome.overlay.is_none());
        assert_eq!(
            tui.notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Error)
        );
    }

    #[test]
    fn test_buy_opens_summary() {
        let mut tui = TuiState::new(Config::default());
        handle_key(&mut tui, key(KeyCode::Enter));
        let outcome = handle_key(&mut tui, key(KeyCode::Char('b')));
        assert!(matches!(
            outcome.overlay,
            Some(OverlayRequest::Purchase { ref summary }) if summary.starts_with("Confirm purchase:")
        ));
    }
}
