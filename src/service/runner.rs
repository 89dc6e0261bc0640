//! Async driver for the observer core.
//!
//! # Responsibilities
//! - Own the [`RouterObserver`] inside a single task
//! - Fire timers when their deadline passes on the tokio clock
//! - Feed host events from an injected channel
//! - Publish every derived event on a broadcast channel

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, Instant};

use crate::observer::{ObserverEvent, RouterObserver};
use crate::routing::GroupRegistry;
use crate::service::host::NavigationEvent;
use crate::timer::{Scheduler, TimerQueue};

/// Default capacity of the outbound event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Runs a [`RouterObserver`] against real (tokio) time.
pub struct ObserverService<S = TimerQueue> {
    observer: RouterObserver<S>,
    events: broadcast::Sender<ObserverEvent>,
}

impl ObserverService<TimerQueue> {
    pub fn new(registry: GroupRegistry) -> Self {
        Self::with_observer(RouterObserver::new(registry), DEFAULT_EVENT_CAPACITY)
    }
}

impl<S: Scheduler> ObserverService<S> {
    /// Wrap an observer whose scheduler clock starts at zero.
    pub fn with_observer(observer: RouterObserver<S>, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self { observer, events }
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ObserverEvent> {
        self.events.subscribe()
    }

    fn publish(&self, events: Vec<ObserverEvent>) {
        for event in events {
            // No subscribers is not an error.
            let _ = self.events.send(event);
        }
    }

    /// Drive the observer until shutdown, or until `inbound` closes and no timers remain.
    ///
    /// Returns the observer so callers can inspect its final state.
    pub async fn run(
        self,
        mut inbound: mpsc::Receiver<NavigationEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> RouterObserver<S> {
        let mut service = self;
        let epoch = Instant::now();
        let mut inbound_open = true;
        let mut shutdown_open = true;

        tracing::info!(groups = service.observer.registry().len(), "Observer service starting");

        loop {
            let deadline = service.observer.next_deadline().map(|d| epoch + d);
            if !inbound_open && deadline.is_none() {
                tracing::info!("Input closed and no timers remain, exiting loop");
                break;
            }

            tokio::select! {
                biased;
                res = shutdown.recv(), if shutdown_open => {
                    match res {
                        Err(broadcast::error::RecvError::Closed) => shutdown_open = false,
                        _ => {
                            tracing::info!("Observer service received shutdown signal, exiting loop");
                            break;
                        }
                    }
                }
                _ = sleep_until(deadline) => {
                    let fired = service.observer.advance_to(epoch.elapsed());
                    service.publish(fired);
                }
                event = inbound.recv(), if inbound_open => {
                    match event {
                        Some(event) => {
                            // Timers due before the event arrived fire first.
                            let fired = service.observer.advance_to(epoch.elapsed());
                            service.publish(fired);

                            tracing::trace!(event = %event, "Navigation event received");
                            let emitted = service.observer.notify(event.into_notification(wall_clock_ms()));
                            service.publish(emitted);
                        }
                        None => inbound_open = false,
                    }
                }
            }
        }

        service.observer
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Milliseconds since the Unix epoch.
fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
