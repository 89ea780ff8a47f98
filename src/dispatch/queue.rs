// src/dispatch/queue.rs
//! Bounded FIFO between producers and the painter loop.
//!
//! A thin layer over `std::sync::mpsc::sync_channel`: pushes block while the
//! queue holds `capacity` entries, which is the only backpressure in the
//! system. Each push is one enqueue, so batches from different producers
//! may interleave at operation granularity.
//!
//! Every push holds a shared read lock on the queue's `closed` flag for the
//! duration of the send. [`QueueReceiver::close`] takes the write lock, so
//! once it returns no push can still be in flight: every operation that got
//! in has been counted, and every later push fails.

use crate::ops::Operation;
use log::trace;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TryRecvError};
use std::sync::{Arc, RwLock, TryLockError};
use std::thread;

/// Queue entry: an operation, or the marker that ends the loop.
#[derive(Debug)]
pub(crate) enum Envelope {
    Op(Operation),
    Stop,
}

/// The receiving end is gone (the loop has exited).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QueueClosed;

pub(crate) fn bounded(capacity: usize) -> (QueueSender, QueueReceiver) {
    let (tx, rx) = sync_channel(capacity);
    let closed = Arc::new(RwLock::new(false));
    (
        QueueSender {
            tx,
            closed: Arc::clone(&closed),
        },
        QueueReceiver { rx, closed },
    )
}

#[derive(Debug, Clone)]
pub(crate) struct QueueSender {
    tx: SyncSender<Envelope>,
    closed: Arc<RwLock<bool>>,
}

impl QueueSender {
    /// Enqueue one operation, blocking while the queue is full.
    pub(crate) fn push(&self, op: Operation) -> Result<(), QueueClosed> {
        trace!("CommandQueue: push {:?}", op);
        self.send(Envelope::Op(op))
    }

    /// Enqueue the stop marker behind everything already queued.
    pub(crate) fn push_stop(&self) -> Result<(), QueueClosed> {
        self.send(Envelope::Stop)
    }

    fn send(&self, envelope: Envelope) -> Result<(), QueueClosed> {
        let closed = self.closed.read().map_err(|_| QueueClosed)?;
        if *closed {
            return Err(QueueClosed);
        }
        self.tx.send(envelope).map_err(|_| QueueClosed)
    }
}

#[derive(Debug)]
pub(crate) struct QueueReceiver {
    rx: Receiver<Envelope>,
    closed: Arc<RwLock<bool>>,
}

impl QueueReceiver {
    /// Next entry, blocking while the queue is empty. `None` once every
    /// sender is dropped and the queue is drained.
    pub(crate) fn pull(&self) -> Option<Envelope> {
        self.rx.recv().ok()
    }

    /// Refuse all further pushes and drop everything queued. Pushes that
    /// were blocked on a full queue are let through first and dropped too.
    /// Returns the number of operations dropped.
    pub(crate) fn close(&self) -> usize {
        let mut discarded = 0;
        loop {
            discarded += self.discard_pending();
            match self.closed.try_write() {
                Ok(mut closed) => {
                    *closed = true;
                    break;
                }
                Err(TryLockError::Poisoned(poisoned)) => {
                    *poisoned.into_inner() = true;
                    break;
                }
                Err(TryLockError::WouldBlock) => thread::yield_now(),
            }
        }
        discarded + self.discard_pending()
    }

    /// Drop everything currently queued. Returns the number of operations
    /// dropped; stop markers are not counted.
    fn discard_pending(&self) -> usize {
        let mut discarded = 0;
        loop {
            match self.rx.try_recv() {
                Ok(Envelope::Op(_)) => discarded += 1,
                Ok(Envelope::Stop) => {}
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        discarded
    }
}
