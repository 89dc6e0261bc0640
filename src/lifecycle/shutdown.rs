//! Shutdown signal for the observer service.
//!
//! A trigger stops every subscribed service loop, even with timers still
//! scheduled. Dropping the coordinator closes the channel instead, which the
//! service ignores: it then runs until its input closes and its timers drain.

use tokio::sync::broadcast;

/// Broadcasts a one-shot stop request to every running observer service.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to pass to `ObserverService::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed service to stop. Nothing happens if none is running.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
