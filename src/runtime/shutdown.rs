//! # Shutdown Signal
//!
//! Broadcast of the controller's shutdown request to in-flight reconciliations,
//! so long waits (the cleanup grace period) can stop before acting.

use tokio::sync::watch;

/// Sending half, held by the signal handler
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Receiving half, cloned into every reconciliation
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

/// Create a connected trigger/signal pair
pub fn channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, ShutdownSignal { rx })
}

impl ShutdownTrigger {
    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl ShutdownSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Whether shutdown has been requested
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown is requested
    ///
    /// Pends forever if the trigger is dropped without firing.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|requested| *requested).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_waiters() {
        let (trigger, signal) = channel();
        assert!(!signal.is_triggered());

        let waiter = tokio::spawn({
            let signal = signal.clone();
            async move { signal.triggered().await }
        });
        trigger.trigger();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .expect("waiter should not panic");
        assert!(signal.is_triggered());
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_does_not_fire() {
        let signal = ShutdownSignal::never();
        let fired = tokio::time::timeout(Duration::from_secs(3600), signal.triggered()).await;
        assert!(fired.is_err());
        assert!(!signal.is_triggered());
    }
}
