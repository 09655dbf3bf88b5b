//! Wall-clock bound on a decode.

use std::future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::Sleep;

/// Fires once, `timeout` after [`TimeoutSentinel::start`], unless cancelled first.
///
/// A timeout too large to represent as an instant never fires.
#[derive(Debug)]
pub struct TimeoutSentinel {
    sleep: Option<Pin<Box<Sleep>>>,
}

impl TimeoutSentinel {
    pub fn start(timeout: Duration) -> Self {
        Self {
            sleep: Some(Box::pin(tokio::time::sleep(timeout))),
        }
    }

    /// Resolves when the deadline passes. Never resolves once cancelled.
    pub async fn expired(&mut self) {
        match self.sleep.as_mut() {
            Some(sleep) => {
                sleep.as_mut().await;
                self.sleep = None;
                tracing::debug!("Upload timeout elapsed");
            }
            None => future::pending::<()>().await,
        }
    }

    /// Disarm the timer. Idempotent.
    pub fn cancel(&mut self) {
        self.sleep = None;
    }

    pub fn is_pending(&self) -> bool {
        self.sleep.is_some()
    }
}
