//! Stand-ins for the remote side of the console.
//!
//! Thread acknowledgments and payment settlement are produced by external
//! systems. The console only talks to them through these traits so the
//! simulated versions can be swapped for real integrations.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::payment::PaymentMethod;
use crate::pricing::{Price, format_vnd};
use crate::transcript::{AckKind, AckRequest, LogEntry};

pub type AckFuture = Pin<Box<dyn Future<Output = LogEntry> + Send>>;
pub type SettlementFuture = Pin<Box<dyn Future<Output = Result<Receipt, SettlementError>> + Send>>;

/// Produces the reply to a message or command sent from the console.
pub trait Responder: Send + Sync {
    fn respond(&self, request: AckRequest) -> AckFuture;
}

/// Replies after a fixed delay with a canned acknowledgment.
#[derive(Debug, Clone)]
pub struct SimulatedResponder {
    delay: Duration,
}

impl SimulatedResponder {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedResponder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl Responder for SimulatedResponder {
    fn respond(&self, request: AckRequest) -> AckFuture {
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            canned_reply(&request)
        })
    }
}

fn canned_reply(request: &AckRequest) -> LogEntry {
    match (request.kind, &request.target) {
        (AckKind::Message, _) => LogEntry::incoming("User", "Message received!"),
        (AckKind::Command, Some(_)) => LogEntry::incoming(
            "System",
            format!("✅ Command \"{}\" executed", request.text),
        ),
        (AckKind::Command, None) => LogEntry::system(format!(
            "Command \"{}\" executed successfully",
            request.text
        )),
    }
}

/// What a settlement is asked to charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charge {
    pub reference: String,
    pub amount: Price,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub reference: String,
    pub amount: Price,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementError {
    pub message: String,
}

impl std::fmt::Display for SettlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SettlementError {}

/// Commits the financial side effect of a confirmed payment.
pub trait PaymentGateway: Send + Sync {
    fn settle(&self, charge: Charge) -> SettlementFuture;
}

/// Always succeeds after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl PaymentGateway for SimulatedGateway {
    fn settle(&self, charge: Charge) -> SettlementFuture {
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            tracing::info!(
                reference = %charge.reference,
                amount = %format_vnd(charge.amount),
                method = charge.method.display_name(),
                "simulated settlement complete"
            );
            Ok(Receipt {
                reference: charge.reference,
                amount: charge.amount,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::transcript::{ConversationTarget, EntryKind, TargetKind};

    fn request(kind: AckKind, target: Option<ConversationTarget>) -> AckRequest {
        AckRequest {
            kind,
            text: "hello".to_string(),
            target,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_responder_waits_configured_delay() {
        let responder = SimulatedResponder::default();
        let started = tokio::time::Instant::now();

        let reply = responder.respond(request(AckKind::Message, None)).await;

        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(reply.kind(), EntryKind::IncomingMessage);
        assert_eq!(reply.content(), "Message received!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_command_replies_depend_on_origin() {
        let responder = SimulatedResponder::new(Duration::from_millis(10));
        let target = ConversationTarget::new("g1", TargetKind::Group, "Group");

        let in_thread = responder
            .respond(request(AckKind::Command, Some(target)))
            .await;
        assert_eq!(in_thread.sender(), "System");
        assert_eq!(in_thread.content(), "✅ Command \"hello\" executed");

        let global = responder.respond(request(AckKind::Command, None)).await;
        assert_eq!(global.kind(), EntryKind::Event);
        assert!(global.content().contains("executed successfully"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gateway_settles_after_delay() {
        let gateway = SimulatedGateway::default();
        let started = tokio::time::Instant::now();

        let receipt = gateway
            .settle(Charge {
                reference: "ref-1".to_string(),
                amount: 90_000,
                method: PaymentMethod::Momo,
            })
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(receipt.amount, 90_000);
        assert_eq!(receipt.reference, "ref-1");
    }
}
