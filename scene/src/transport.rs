//! Fire-and-forget message publication
//!
//! State machines publish through the [`Publisher`] capability and never
//! learn whether anything was delivered. [`ChannelPublisher`] feeds a real
//! channel; [`MemoryPublisher`] records sends for inspection in tests and
//! tooling.

use crossbeam_channel::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// One-way, non-blocking publication of messages of type `M`
pub trait Publisher<M> {
    /// Send a message. Never blocks and never reports delivery.
    fn publish(&self, msg: M);
}

/// Publisher backed by an unbounded channel
pub struct ChannelPublisher<M> {
    tx: Sender<M>,
}

impl<M> ChannelPublisher<M> {
    /// Create a publisher and the receiver it feeds
    pub fn unbounded() -> (Self, Receiver<M>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl<M> Publisher<M> for ChannelPublisher<M> {
    fn publish(&self, msg: M) {
        if self.tx.send(msg).is_err() {
            // Receiver gone; fire-and-forget drops the message.
            warn!("Publishing to a disconnected channel, message dropped");
        }
    }
}

impl<M> Clone for ChannelPublisher<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Recording publisher storing every message sent through it
///
/// Clones share the same backing store, so a test can keep one handle and
/// hand another to the component under test.
pub struct MemoryPublisher<M> {
    sent: Arc<Mutex<Vec<M>>>,
}

impl<M> MemoryPublisher<M> {
    /// Create an empty recording publisher
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of messages recorded so far
    pub fn len(&self) -> usize {
        self.sent.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// True when nothing has been published
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain and return everything recorded so far
    pub fn take(&self) -> Vec<M> {
        self.sent
            .lock()
            .map(|mut v| std::mem::take(&mut *v))
            .unwrap_or_default()
    }
}

impl<M: Clone> MemoryPublisher<M> {
    /// Clone of everything recorded so far, without draining
    pub fn snapshot(&self) -> Vec<M> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl<M> Default for MemoryPublisher<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for MemoryPublisher<M> {
    fn clone(&self) -> Self {
        Self {
            sent: Arc::clone(&self.sent),
        }
    }
}

impl<M> Publisher<M> for MemoryPublisher<M> {
    fn publish(&self, msg: M) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(msg);
        }
    }
}
