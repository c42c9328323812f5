//! Timed payment session.
//!
//! A session is a fixed-length payment window over a chosen rental tier.
//! It ends in exactly one of three terminal states and never leaves it:
//!
//! ```text
//!            tick to 0
//!   Active ─────────────► Expired
//!     │ confirm_cancel(gate)
//!     ├─────────────────► Cancelled
//!     │ begin_confirm ─► (settling) ─ complete_confirm ─► Confirmed
//!     │                        └──── abort_confirm ─► Active
//! ```
//!
//! [`Checkout`] owns the current session and its single countdown handle.

mod countdown;

use std::fmt;

use uuid::Uuid;

pub use countdown::Countdown;

use crate::collaborators::Charge;
use crate::pricing::{Price, RentalTier};
use crate::validation::{ValidationError, require, require_email};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Momo,
    Bank,
    Card,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Momo, PaymentMethod::Bank, PaymentMethod::Card];

    pub fn display_name(self) -> &'static str {
        match self {
            PaymentMethod::Momo => "MoMo",
            PaymentMethod::Bank => "Banking",
            PaymentMethod::Card => "Card",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            PaymentMethod::Momo => PaymentMethod::Bank,
            PaymentMethod::Bank => PaymentMethod::Card,
            PaymentMethod::Card => PaymentMethod::Momo,
        }
    }
}

/// A validated rental checkout: what is bought and who it is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalOrder {
    pub tier: RentalTier,
    pub method: PaymentMethod,
    pub prefix: String,
    pub email: String,
}

impl RentalOrder {
    /// # Errors
    /// Fails when the bot prefix is blank or the email is missing or malformed.
    pub fn new(
        tier: RentalTier,
        method: PaymentMethod,
        prefix: &str,
        email: &str,
    ) -> Result<Self, ValidationError> {
        let prefix = require("bot prefix", prefix)?;
        let email = require_email(email)?;
        Ok(Self {
            tier,
            method,
            prefix: prefix.to_string(),
            email: email.to_string(),
        })
    }

    pub fn amount(&self) -> Price {
        self.tier.total_price()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Confirmed,
    Cancelled,
    Expired,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        self != SessionState::Active
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionState::Active => "active",
            SessionState::Confirmed => "confirmed",
            SessionState::Cancelled => "cancelled",
            SessionState::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running(u32),
    Expired,
    /// Stale session, terminal state or settlement in progress.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    NoSession,
    NotActive(SessionState),
    Settling,
    /// Gate or ticket was issued for a different session.
    Stale,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoSession => write!(f, "No payment in progress"),
            SessionError::NotActive(state) => write!(f, "Payment is already {}", state.label()),
            SessionError::Settling => write!(f, "Payment is being processed"),
            SessionError::Stale => write!(f, "Payment session has changed"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Proof that the operator was asked to confirm cancellation of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelGate {
    session: SessionId,
}

impl CancelGate {
    pub fn session(&self) -> SessionId {
        self.session
    }
}

/// Issued when settlement starts; redeemed when it completes or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementTicket {
    session: SessionId,
    charge: Charge,
}

impl SettlementTicket {
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn charge(&self) -> &Charge {
        &self.charge
    }
}

#[derive(Debug, Clone)]
pub struct PaymentSession {
    id: SessionId,
    reference: Uuid,
    order: RentalOrder,
    remaining_secs: u32,
    state: SessionState,
    settling: bool,
}

impl PaymentSession {
    fn new(id: SessionId, order: RentalOrder, window_secs: u32) -> Self {
        Self {
            id,
            reference: Uuid::new_v4(),
            order,
            remaining_secs: window_secs.max(1),
            state: SessionState::Active,
            settling: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn reference(&self) -> Uuid {
        self.reference
    }

    pub fn order(&self) -> &RentalOrder {
        &self.order
    }

    pub fn tier(&self) -> RentalTier {
        self.order.tier
    }

    pub fn method(&self) -> PaymentMethod {
        self.order.method
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_settling(&self) -> bool {
        self.settling
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.state.is_terminal() {
            return Err(SessionError::NotActive(self.state));
        }
        if self.settling {
            return Err(SessionError::Settling);
        }
        Ok(())
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.ensure_open().is_err() {
            return TickOutcome::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = SessionState::Expired;
            tracing::info!(session = %self.id, "payment window expired");
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining_secs)
        }
    }

    /// # Errors
    /// Fails unless the session is active and not settling.
    pub fn request_cancel(&self) -> Result<CancelGate, SessionError> {
        self.ensure_open()?;
        Ok(CancelGate { session: self.id })
    }

    /// # Errors
    /// Fails for a gate from another session, or when the session is no longer
    /// active or has started settling since the gate was issued.
    pub fn confirm_cancel(&mut self, gate: CancelGate) -> Result<(), SessionError> {
        if gate.session != self.id {
            return Err(SessionError::Stale);
        }
        self.ensure_open()?;
        self.state = SessionState::Cancelled;
        tracing::info!(session = %self.id, "payment cancelled");
        Ok(())
    }

    /// # Errors
    /// Fails unless the session is active and not already settling.
    pub fn begin_confirm(&mut self) -> Result<SettlementTicket, SessionError> {
        self.ensure_open()?;
        self.settling = true;
        Ok(SettlementTicket {
            session: self.id,
            charge: Charge {
                reference: self.reference.to_string(),
                amount: self.order.amount(),
                method: self.order.method,
            },
        })
    }

    /// # Errors
    /// Fails for a ticket from another session or when no settlement is running.
    pub fn complete_confirm(&mut self, ticket: &SettlementTicket) -> Result<(), SessionError> {
        self.redeem(ticket)?;
        self.state = SessionState::Confirmed;
        tracing::info!(session = %self.id, reference = %self.reference, "payment confirmed");
        Ok(())
    }

    /// Settlement failed; the session is active again with its remaining time.
    ///
    /// # Errors
    /// Fails for a ticket from another session or when no settlement is running.
    pub fn abort_confirm(&mut self, ticket: &SettlementTicket) -> Result<(), SessionError> {
        self.redeem(ticket)?;
        tracing::warn!(session = %self.id, "settlement failed, payment window resumed");
        Ok(())
    }

    fn redeem(&mut self, ticket: &SettlementTicket) -> Result<(), SessionError> {
        if ticket.session != self.id {
            return Err(SessionError::Stale);
        }
        if self.state.is_terminal() {
            return Err(SessionError::NotActive(self.state));
        }
        if !self.settling {
            return Err(SessionError::NotActive(self.state));
        }
        self.settling = false;
        Ok(())
    }
}

/// Current payment session plus the one countdown that drives it.
#[derive(Debug)]
pub struct Checkout {
    session: Option<PaymentSession>,
    countdown: Option<Countdown>,
    next_id: u64,
    window_secs: u32,
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new(crate::config::Config::DEFAULT_PAYMENT_WINDOW_SECS)
    }
}

impl Checkout {
    pub fn new(window_secs: u32) -> Self {
        Self {
            session: None,
            countdown: None,
            next_id: 0,
            window_secs: window_secs.max(1),
        }
    }

    pub fn session(&self) -> Option<&PaymentSession> {
        self.session.as_ref()
    }

    pub fn has_live_countdown(&self) -> bool {
        self.countdown.as_ref().is_some_and(Countdown::is_live)
    }

    /// Starts a brand-new session with a full window. Any previous countdown
    /// is stopped before the new session exists.
    pub fn open(&mut self, order: RentalOrder) -> SessionId {
        self.countdown = None;
        self.next_id += 1;
        let id = SessionId(self.next_id);
        tracing::info!(
            session = %id,
            days = order.tier.days.get(),
            amount = order.amount(),
            method = order.method.display_name(),
            "payment session opened"
        );
        self.session = Some(PaymentSession::new(id, order, self.window_secs));
        id
    }

    /// Installs the countdown for `id`. Refused (and the handle dropped) if
    /// `id` is not the current, running session.
    pub fn attach_countdown(&mut self, id: SessionId, countdown: Countdown) -> bool {
        let accepts = self
            .session
            .as_ref()
            .is_some_and(|s| s.id == id && s.ensure_open().is_ok());
        if accepts {
            self.countdown = Some(countdown);
        }
        accepts
    }

    pub fn on_tick(&mut self, id: SessionId) -> TickOutcome {
        let Some(session) = self.session.as_mut().filter(|s| s.id == id) else {
            return TickOutcome::Ignored;
        };
        let outcome = session.tick();
        if outcome == TickOutcome::Expired {
            self.countdown = None;
        }
        outcome
    }

    /// # Errors
    /// See [`PaymentSession::request_cancel`].
    pub fn request_cancel(&self) -> Result<CancelGate, SessionError> {
        self.current()?.request_cancel()
    }

    /// # Errors
    /// See [`PaymentSession::confirm_cancel`].
    pub fn confirm_cancel(&mut self, gate: CancelGate) -> Result<(), SessionError> {
        self.current_mut()?.confirm_cancel(gate)?;
        self.countdown = None;
        Ok(())
    }

    /// Stops the countdown and starts settlement.
    ///
    /// # Errors
    /// See [`PaymentSession::begin_confirm`].
    pub fn begin_confirm(&mut self) -> Result<SettlementTicket, SessionError> {
        let ticket = self.current_mut()?.begin_confirm()?;
        self.countdown = None;
        Ok(ticket)
    }

    /// # Errors
    /// See [`PaymentSession::complete_confirm`].
    pub fn complete_confirm(&mut self, ticket: &SettlementTicket) -> Result<(), SessionError> {
        self.current_mut()?.complete_confirm(ticket)
    }

    /// Returns the session whose countdown must be restarted.
    ///
    /// # Errors
    /// See [`PaymentSession::abort_confirm`].
    pub fn abort_confirm(&mut self, ticket: &SettlementTicket) -> Result<SessionId, SessionError> {
        let session = self.current_mut()?;
        session.abort_confirm(ticket)?;
        Ok(session.id)
    }

    /// Forgets the session and stops its countdown.
    pub fn close(&mut self) {
        self.countdown = None;
        self.session = None;
    }

    fn current(&self) -> Result<&PaymentSession, SessionError> {
        self.session.as_ref().ok_or(SessionError::NoSession)
    }

    fn current_mut(&mut self) -> Result<&mut PaymentSession, SessionError> {
        self.session.as_mut().ok_or(SessionError::NoSession)
    }
}

/// Renders remaining seconds as `M:SS`.
pub fn format_remaining(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::pricing::RentalDays;

    fn order(days: u32) -> RentalOrder {
        let tier = RentalTier::for_days(RentalDays::new(days).unwrap());
        RentalOrder::new(tier, PaymentMethod::Momo, "!bot", "ops@example.com").unwrap()
    }

    fn active_session() -> PaymentSession {
        PaymentSession::new(SessionId(1), order(15), 900)
    }

    #[test]
    fn test_new_session_is_active_with_full_window() {
        let session = active_session();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.remaining_secs(), 900);
        assert_eq!(session.tier().total_price(), 90_000);
    }

    #[test]
    fn test_tick_counts_down_and_expires() {
        let mut session = PaymentSession::new(SessionId(1), order(15), 3);
        assert_eq!(session.tick(), TickOutcome::Running(2));
        assert_eq!(session.tick(), TickOutcome::Running(1));
        assert_eq!(session.tick(), TickOutcome::Expired);
        assert_eq!(session.state(), SessionState::Expired);
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn test_cancel_requires_gate_for_same_session() {
        let mut session = active_session();
        let foreign = CancelGate {
            session: SessionId(7),
        };
        assert_eq!(session.confirm_cancel(foreign), Err(SessionError::Stale));
        assert_eq!(session.state(), SessionState::Active);

        let gate = session.request_cancel().unwrap();
        session.confirm_cancel(gate).unwrap();
        assert_eq!(session.state(), SessionState::Cancelled);
    }

    #[test]
    fn test_terminal_states_are_irreversible() {
        let mut expired = PaymentSession::new(SessionId(1), order(15), 1);
        assert_eq!(expired.tick(), TickOutcome::Expired);

        let mut cancelled = active_session();
        let gate = cancelled.request_cancel().unwrap();
        cancelled.confirm_cancel(gate).unwrap();

        let mut confirmed = active_session();
        let ticket = confirmed.begin_confirm().unwrap();
        confirmed.complete_confirm(&ticket).unwrap();

        for session in [&mut expired, &mut cancelled, &mut confirmed] {
            let state = session.state();
            let remaining = session.remaining_secs();
            assert_eq!(session.tick(), TickOutcome::Ignored);
            assert_eq!(session.request_cancel(), Err(SessionError::NotActive(state)));
            assert_eq!(session.begin_confirm(), Err(SessionError::NotActive(state)));
            assert_eq!(session.state(), state);
            assert_eq!(session.remaining_secs(), remaining);
        }
    }

    #[test]
    fn test_settling_rejects_ticks_and_cancel() {
        let mut session = active_session();
        let gate = session.request_cancel().unwrap();
        let ticket = session.begin_confirm().unwrap();

        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.remaining_secs(), 900);
        assert_eq!(session.confirm_cancel(gate), Err(SessionError::Settling));
        assert_eq!(session.begin_confirm(), Err(SessionError::Settling));

        session.complete_confirm(&ticket).unwrap();
        assert_eq!(session.state(), SessionState::Confirmed);
    }

    #[test]
    fn test_abort_confirm_resumes_session() {
        let mut session = active_session();
        session.tick();
        let ticket = session.begin_confirm().unwrap();
        session.abort_confirm(&ticket).unwrap();

        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.tick(), TickOutcome::Running(898));
        assert!(session.complete_confirm(&ticket).is_err());
    }

    #[test]
    fn test_ticket_carries_charge() {
        let mut session = active_session();
        let ticket = session.begin_confirm().unwrap();
        assert_eq!(ticket.charge().amount, 90_000);
        assert_eq!(ticket.charge().reference, session.reference().to_string());
        assert_eq!(ticket.charge().method, PaymentMethod::Momo);
    }

    #[test]
    fn test_order_validation() {
        let tier = RentalTier::default();
        assert_eq!(
            RentalOrder::new(tier, PaymentMethod::Card, " ", "ops@example.com"),
            Err(ValidationError::Missing { field: "bot prefix" })
        );
        assert_eq!(
            RentalOrder::new(tier, PaymentMethod::Card, "!bot", ""),
            Err(ValidationError::Missing { field: "email" })
        );
    }

    #[test]
    fn test_reopen_starts_fresh_window() {
        let mut checkout = Checkout::new(900);
        let first = checkout.open(order(15));
        checkout.on_tick(first);
        let ticket = checkout.begin_confirm().unwrap();
        checkout.complete_confirm(&ticket).unwrap();
        assert_eq!(checkout.session().unwrap().state(), SessionState::Confirmed);

        let second = checkout.open(order(15));
        assert_ne!(first, second);
        let session = checkout.session().unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.remaining_secs(), 900);
        assert_eq!(checkout.on_tick(first), TickOutcome::Ignored);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(900), "15:00");
        assert_eq!(format_remaining(61), "1:01");
        assert_eq!(format_remaining(9), "0:09");
    }

    fn spawn_ticks(tx: &mpsc::UnboundedSender<SessionId>, id: SessionId) -> Countdown {
        let tx = tx.clone();
        Countdown::spawn(Duration::from_secs(1), move || tx.send(id).is_ok())
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_session_leaves_single_live_countdown() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut checkout = Checkout::new(900);

        let first = checkout.open(order(15));
        assert!(checkout.attach_countdown(first, spawn_ticks(&tx, first)));

        let second = checkout.open(order(30));
        assert!(!checkout.has_live_countdown());
        assert!(checkout.attach_countdown(second, spawn_ticks(&tx, second)));
        assert!(!checkout.attach_countdown(first, spawn_ticks(&tx, first)));

        tokio::time::sleep(Duration::from_millis(5500)).await;

        let mut ticks = Vec::new();
        while let Ok(id) = rx.try_recv() {
            ticks.push(id);
        }
        assert_eq!(ticks, vec![second; 5]);
        for id in ticks {
            checkout.on_tick(id);
        }
        assert_eq!(checkout.session().unwrap().remaining_secs(), 895);
        assert!(checkout.has_live_countdown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_stops_countdown_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut checkout = Checkout::new(900);
        let id = checkout.open(order(15));
        checkout.attach_countdown(id, spawn_ticks(&tx, id));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let ticket = checkout.begin_confirm().unwrap();
        assert!(!checkout.has_live_countdown());
        tokio::time::sleep(Duration::from_secs(3)).await;
        checkout.complete_confirm(&ticket).unwrap();

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 1);
        assert_eq!(checkout.session().unwrap().state(), SessionState::Confirmed);
    }

    #[test]
    fn test_expiry_drops_countdown_handle() {
        let mut checkout = Checkout::new(2);
        let id = checkout.open(order(7));
        assert_eq!(checkout.on_tick(id), TickOutcome::Running(1));
        assert_eq!(checkout.on_tick(id), TickOutcome::Expired);
        assert!(!checkout.has_live_countdown());
        assert_eq!(checkout.request_cancel(), Err(SessionError::NotActive(SessionState::Expired)));
    }
}
