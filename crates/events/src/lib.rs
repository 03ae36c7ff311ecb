//! Realtime event delivery for the focusdesk backend.
//!
//! Provides the [`Notifier`], a per-channel subscriber registry that the
//! task controller publishes session state-change events into and the
//! WebSocket layer drains.

pub mod notifier;

pub use notifier::{Notifier, Subscription};
