use std::sync::Arc;

use botdesk_core::collaborators::{PaymentGateway, Responder};
use botdesk_core::payment::SettlementTicket;
use botdesk_core::transcript::PendingAck;

use crate::events::UiEvent;

/// Waits for the acknowledgment of a thread message or command.
pub async fn request_ack(responder: Arc<dyn Responder>, pending: PendingAck) -> UiEvent {
    let PendingAck { route, request } = pending;
    let reply = responder.respond(request).await;
    UiEvent::AckArrived { route, reply }
}

/// Runs the settlement for a confirmed payment.
pub async fn settle(gateway: Arc<dyn PaymentGateway>, ticket: SettlementTicket) -> UiEvent {
    let result = gateway.settle(ticket.charge().clone()).await;
    if let Err(err) = &result {
        tracing::warn!(session = %ticket.session(), error = %err, "settlement failed");
    }
    UiEvent::Settled { ticket, result }
}
