//! Backpressured progress channel between the pipeline and its transport.
//!
//! `emit()` waits for a free slot, so with the default capacity of one the
//! pipeline never runs more than a single frame ahead of the consumer. A
//! dropped receiver surfaces as `Disconnected` on the next emit, and
//! `closed()` lets in-flight stages notice the disconnect early.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::mpsc;

use super::types::ProgressEvent;

/// The consumer went away; no further frames can be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("progress consumer disconnected")]
pub struct Disconnected;

pub struct EventSink {
    sender: mpsc::Sender<ProgressEvent>,
    emitted: AtomicU64,
}

impl EventSink {
    /// Create a sink and the receiver the transport drains.
    ///
    /// A capacity of zero is raised to one.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let sink = Self {
            sender,
            emitted: AtomicU64::new(0),
        };
        (sink, receiver)
    }

    pub async fn emit(&self, event: ProgressEvent) -> Result<(), Disconnected> {
        self.sender.send(event).await.map_err(|_| Disconnected)?;
        self.emitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Resolves once the receiver is dropped
    pub async fn closed(&self) {
        self.sender.closed().await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Frames handed to the consumer so far
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }
}
