//! Single-slot, latest-wins mailbox for detection batches
//!
//! The analysis side never blocks: if the coordinator has not picked up the
//! previous batch yet, that batch is evicted and replaced. Detections are
//! only valid for their own frame, so a stale batch is worth nothing.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::trace;

use super::messages::DetectionBatch;
use crate::vision::{DetectedNumber, FrameSize};

/// The receiving side has gone away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("frame mailbox closed")]
pub struct MailboxClosed;

/// Create a connected mailbox pair
pub fn frame_mailbox() -> (FrameSender, FrameReceiver) {
    let (tx, rx) = bounded(1);
    let closed = Arc::new(AtomicBool::new(false));

    let sender = FrameSender {
        tx,
        evict: rx.clone(),
        next_sequence: Arc::new(Mutex::new(1)),
        closed: closed.clone(),
    };
    let receiver = FrameReceiver { rx, closed };

    (sender, receiver)
}

/// Analysis-side handle
#[derive(Debug, Clone)]
pub struct FrameSender {
    tx: Sender<DetectionBatch>,
    /// Used only to pop a stale batch out of the full slot
    evict: Receiver<DetectionBatch>,
    /// Held across numbering and sending so cloned senders cannot reorder
    next_sequence: Arc<Mutex<u64>>,
    closed: Arc<AtomicBool>,
}

impl FrameSender {
    /// Hand one frame's detections to the coordinator.
    ///
    /// Assigns the batch sequence number and returns it.
    pub fn submit(
        &self,
        frame_size: FrameSize,
        detections: Vec<DetectedNumber>,
    ) -> Result<u64, MailboxClosed> {
        if self.closed.load(Ordering::Acquire) {
            return Err(MailboxClosed);
        }

        let mut next_sequence = self.next_sequence.lock();
        let sequence = *next_sequence;
        *next_sequence += 1;
        let mut batch = DetectionBatch {
            sequence,
            frame_size,
            detections,
        };

        loop {
            match self.tx.try_send(batch) {
                Ok(()) => return Ok(sequence),
                Err(TrySendError::Full(rejected)) => {
                    if let Ok(stale) = self.evict.try_recv() {
                        trace!("Evicted unprocessed batch {}", stale.sequence);
                    }
                    batch = rejected;
                }
                Err(TrySendError::Disconnected(_)) => return Err(MailboxClosed),
            }
        }
    }
}

/// Coordinator-side handle
#[derive(Debug)]
pub struct FrameReceiver {
    rx: Receiver<DetectionBatch>,
    closed: Arc<AtomicBool>,
}

impl FrameReceiver {
    /// Block until a batch arrives; `None` once every sender is dropped
    pub fn recv(&self) -> Option<DetectionBatch> {
        self.rx.recv().ok()
    }

    /// Wait up to `timeout` for a batch.
    ///
    /// `Err` once every sender is dropped, `Ok(None)` on timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<DetectionBatch>, MailboxClosed> {
        match self.rx.recv_timeout(timeout) {
            Ok(batch) => Ok(Some(batch)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(MailboxClosed),
        }
    }

    /// Take the waiting batch without blocking
    pub fn try_recv(&self) -> Result<Option<DetectionBatch>, MailboxClosed> {
        match self.rx.try_recv() {
            Ok(batch) => Ok(Some(batch)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(MailboxClosed),
        }
    }
}

impl Drop for FrameReceiver {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::Release);
    }
}
