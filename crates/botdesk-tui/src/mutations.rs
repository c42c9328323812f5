//! Cross-slice state mutations.
//!
//! Overlays return these mutations to request changes outside their own
//! state. The main reducer applies them in order.

use botdesk_core::payment::CancelGate;

use crate::state::Notice;

#[derive(Debug)]
pub enum StateMutation {
    Notice(Notice),
    Payment(PaymentMutation),
    Shop(ShopMutation),
}

#[derive(Debug)]
pub enum PaymentMutation {
    /// Operator confirmed the cancel prompt for this gate.
    ConfirmCancel(CancelGate),
}

#[derive(Debug)]
pub enum ShopMutation {
    /// Operator confirmed the purchase summary.
    PurchaseConfirmed,
}
