//! Engine Output Event System
//!
//! Every engine call publishes its sanitized output channels on an
//! [`OutputBus`]. Subscribers get typed events and detach explicitly with
//! [`OutputSubscription::unsubscribe`] (or by dropping the subscription).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Events emitted after an engine call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Standard output of one call
    StdoutChunk {
        /// Command as dispatched to the engine
        command: String,
        /// Sanitized text
        text: String,
    },
    /// Standard error of one call
    StderrChunk {
        /// Command as dispatched to the engine
        command: String,
        /// Sanitized text
        text: String,
    },
}

/// Subscription handle for receiving engine events
#[derive(Debug)]
pub struct OutputSubscription {
    receiver: broadcast::Receiver<EngineEvent>,
    active: Arc<AtomicUsize>,
}

impl OutputSubscription {
    /// Receive the next event, waiting if necessary; `None` once the bus is gone
    pub async fn recv(&mut self) -> Option<EngineEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!("Output subscriber lagged by {} events", count);
                }
            }
        }
    }

    /// Try to receive an event without waiting
    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!("Output subscriber lagged by {} events", count);
                }
                Err(_) => return None,
            }
        }
    }

    /// Detach from the bus
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for OutputSubscription {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Output event bus for publishing and subscribing to engine output
#[derive(Debug, Clone)]
pub struct OutputBus {
    sender: broadcast::Sender<EngineEvent>,
    /// Active subscribers count (for monitoring)
    active: Arc<AtomicUsize>,
}

impl OutputBus {
    /// Create a new bus with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> OutputSubscription {
        self.active.fetch_add(1, Ordering::SeqCst);
        OutputSubscription {
            receiver: self.sender.subscribe(),
            active: Arc::clone(&self.active),
        }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: EngineEvent) {
        // An error only means nobody is listening
        let _ = self.sender.send(event);
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for OutputBus {
    fn default() -> Self {
        Self::new(256)
    }
}
