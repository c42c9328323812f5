use botdesk_core::collaborators::{Receipt, SettlementError};
use botdesk_core::payment::{CancelGate, Countdown, SessionId, SettlementTicket, TickOutcome};
use crossterm::event::{KeyCode, KeyEvent};

use crate::effects::UiEffect;
use crate::features::KeyOutcome;
use crate::overlays::OverlayRequest;
use crate::state::{Notice, Screen, TuiState};

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') => match tui.checkout.begin_confirm() {
            Ok(ticket) => {
                tui.notify(Notice::info("Processing payment..."));
                KeyOutcome::effect(UiEffect::Settle { task: None, ticket })
            }
            Err(err) => {
                tui.notify(Notice::error(err.to_string()));
                KeyOutcome::none()
            }
        },
        KeyCode::Esc | KeyCode::Char('c') => match tui.checkout.request_cancel() {
            Ok(gate) => KeyOutcome::overlay(OverlayRequest::CancelPayment(gate)),
            Err(err) => {
                tui.notify(Notice::error(err.to_string()));
                KeyOutcome::none()
            }
        },
        _ => KeyOutcome::none(),
    }
}

/// The countdown task for `session` is running; keep its handle.
pub fn on_countdown_started(tui: &mut TuiState, session: SessionId, countdown: Countdown) {
    if !tui.checkout.attach_countdown(session, countdown) {
        tracing::debug!(session = %session, "dropping countdown for stale session");
    }
}

pub fn on_tick(tui: &mut TuiState, session: SessionId) {
    if tui.checkout.on_tick(session) == TickOutcome::Expired {
        tui.notify(Notice::error("Payment window expired. Please choose a plan again."));
        tui.screen = Screen::Rental;
    }
}

/// Operator answered yes to the cancel prompt.
pub fn confirm_cancel(tui: &mut TuiState, gate: CancelGate) {
    match tui.checkout.confirm_cancel(gate) {
        Ok(()) => {
            tui.notify(Notice::info("Payment cancelled"));
            tui.screen = Screen::Rental;
        }
        // The session moved on while the prompt was open (expired or settling).
        Err(err) => tui.notify(Notice::error(err.to_string())),
    }
}

pub fn on_settled(
    tui: &mut TuiState,
    ticket: &SettlementTicket,
    result: Result<Receipt, SettlementError>,
) -> Vec<UiEffect> {
    match result {
        Ok(receipt) => {
            if let Err(err) = tui.checkout.complete_confirm(ticket) {
                tracing::warn!(error = %err, "settlement result for a stale session");
                return vec![];
            }
            tracing::info!(reference = %receipt.reference, amount = receipt.amount, "payment settled");
            tui.notify(Notice::success("Payment successful!"));
            tui.rental.clear_contact();
            tui.screen = Screen::Console;
            vec![]
        }
        Err(err) => match tui.checkout.abort_confirm(ticket) {
            Ok(session) => {
                tui.notify(Notice::error(format!("Payment failed: {err}")));
                vec![UiEffect::StartCountdown { session }]
            }
            Err(stale) => {
                tracing::warn!(error = %stale, "settlement failure for a stale session");
                vec![]
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use botdesk_core::config::Config;
    use botdesk_core::payment::{PaymentMethod, RentalOrder, SessionState};
    use botdesk_core::pricing::RentalTier;

    use super::*;

    fn open_session(tui: &mut TuiState) -> SessionId {
        let order = RentalOrder::new(
            RentalTier::default(),
            PaymentMethod::Momo,
            "!",
            "ops@example.com",
        )
        .unwrap();
        tui.screen = Screen::Payment;
        tui.checkout.open(order)
    }

    #[test]
    fn test_failed_settlement_reopens_session_and_restarts_countdown() {
        let mut tui = TuiState::new(Config::default());
        let session = open_session(&mut tui);
        let ticket = tui.checkout.begin_confirm().unwrap();

        let effects = on_settled(
            &mut tui,
            &ticket,
            Err(SettlementError {
                message: "declined".to_string(),
            }),
        );

        let current = tui.checkout.session().unwrap();
        assert_eq!(current.state(), SessionState::Active);
        assert!(!current.is_settling());
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::StartCountdown { session: restarted }] if *restarted == session
        ));
        assert_eq!(
            tui.notice.as_ref().map(|n| n.text.as_str()),
            Some("Payment failed: declined")
        );
        assert_eq!(tui.screen, Screen::Payment);
    }

    #[test]
    fn test_successful_settlement_confirms_and_returns_home() {
        let mut tui = TuiState::new(Config::default());
        open_session(&mut tui);
        let ticket = tui.checkout.begin_confirm().unwrap();
        let receipt = Receipt {
            reference: "ref".to_string(),
            amount: 90_000,
        };

        let effects = on_settled(&mut tui, &ticket, Ok(receipt));

        assert!(effects.is_empty());
        assert_eq!(
            tui.checkout.session().map(|s| s.state()),
            Some(SessionState::Confirmed)
        );
        assert_eq!(tui.screen, Screen::Console);
    }
}
