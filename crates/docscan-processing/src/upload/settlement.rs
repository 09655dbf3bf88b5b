//! Settle-once gate for a decode.
//!
//! Every terminal signal races to call [`SettlementGate::settle`]; the first one
//! wins and every later call is ignored.

use std::sync::Mutex;

use docscan_core::{UploadErrorKind, UploadOutcome};
use tokio::sync::oneshot;

/// Write side of the gate. Shared by reference between the competing signals.
#[derive(Debug)]
pub struct SettlementGate {
    sender: Mutex<Option<oneshot::Sender<UploadOutcome>>>,
}

/// Read side of the gate.
#[derive(Debug)]
pub struct Settlement {
    receiver: oneshot::Receiver<UploadOutcome>,
}

impl SettlementGate {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (SettlementGate, Settlement) {
        let (tx, rx) = oneshot::channel();
        (
            SettlementGate {
                sender: Mutex::new(Some(tx)),
            },
            Settlement { receiver: rx },
        )
    }

    /// Deliver `outcome` if nothing has been delivered yet.
    ///
    /// Returns `true` only for the call that actually settled the gate.
    pub fn settle(&self, outcome: UploadOutcome) -> bool {
        let sender = match self.sender.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match sender {
            Some(tx) => {
                // A dropped receiver still counts as settled; nobody is left to tell.
                let _ = tx.send(outcome);
                true
            }
            None => {
                tracing::trace!(?outcome, "Upload already settled, ignoring late signal");
                false
            }
        }
    }

    pub fn is_settled(&self) -> bool {
        match self.sender.lock() {
            Ok(guard) => guard.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}

impl Settlement {
    /// Wait for the winning outcome.
    ///
    /// A gate dropped without settling reports a malformed body.
    pub async fn outcome(self) -> UploadOutcome {
        self.receiver
            .await
            .unwrap_or(UploadOutcome::Failure(UploadErrorKind::MalformedMultipart))
    }
}
