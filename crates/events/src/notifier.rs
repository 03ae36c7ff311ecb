//! Per-channel subscriber registry with at-most-once delivery.
//!
//! [`Notifier`] is the process-local push hub: exactly one subscriber per
//! channel key (typically a user id), replace-on-subscribe, no queuing and
//! no retry. If nothing is subscribed to a channel, published events are
//! silently dropped. This mirrors a live dashboard push model, not a
//! durable event log.
//!
//! Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
//! shared across the application.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};

use focusdesk_core::event::SessionEvent;
use focusdesk_core::store::EventSink;

/// A registered subscriber: the channel sender plus the token that names
/// this particular registration.
struct Subscriber {
    token: u64,
    sender: mpsc::UnboundedSender<SessionEvent>,
}

/// Handle returned by [`Notifier::subscribe`].
///
/// The `token` identifies this registration so a stale connection cannot
/// tear down a replacement that took over its channel.
pub struct Subscription {
    pub token: u64,
    pub receiver: mpsc::UnboundedReceiver<SessionEvent>,
}

/// In-process realtime notifier keyed by channel id.
pub struct Notifier {
    subscribers: RwLock<HashMap<String, Subscriber>>,
    next_token: AtomicU64,
}

impl Notifier {
    /// Create a new, empty notifier.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_token: AtomicU64::new(1),
        }
    }

    /// Register the sole subscriber for a channel.
    ///
    /// Any prior registration for the key is replaced; its receiver
    /// observes a closed channel on the next receive.
    pub async fn subscribe(&self, channel: impl Into<String>) -> Subscription {
        let channel = channel.into();
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        let replaced = self
            .subscribers
            .write()
            .await
            .insert(channel.clone(), Subscriber { token, sender: tx });
        if replaced.is_some() {
            tracing::debug!(channel = %channel, "Replaced existing subscriber");
        }

        Subscription {
            token,
            receiver: rx,
        }
    }

    /// Remove the channel's subscriber, but only if it is still the
    /// registration named by `token`. Returns whether a removal happened.
    pub async fn unsubscribe(&self, channel: &str, token: u64) -> bool {
        let mut subscribers = self.subscribers.write().await;
        match subscribers.get(channel) {
            Some(current) if current.token == token => {
                subscribers.remove(channel);
                true
            }
            _ => false,
        }
    }

    /// Deliver an event to the channel's subscriber, if any.
    ///
    /// Best-effort and at-most-once: no subscriber or a closed sink both
    /// mean the event is dropped without error.
    pub async fn publish(&self, channel: &str, event: SessionEvent) {
        let subscribers = self.subscribers.read().await;
        match subscribers.get(channel) {
            Some(subscriber) => {
                if subscriber.sender.send(event).is_err() {
                    tracing::debug!(channel = %channel, "Subscriber gone; event dropped");
                }
            }
            None => {
                tracing::trace!(channel = %channel, "No subscriber; event dropped");
            }
        }
    }

    /// Current number of registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Drop every registration, closing all receivers.
    ///
    /// Used during graceful shutdown so connection tasks observe a closed
    /// channel and exit.
    pub async fn shutdown_all(&self) {
        let mut subscribers = self.subscribers.write().await;
        let count = subscribers.len();
        subscribers.clear();
        tracing::info!(count, "Closed all realtime subscribers");
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for Notifier {
    async fn publish(&self, channel: &str, event: SessionEvent) {
        Notifier::publish(self, channel, event).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
