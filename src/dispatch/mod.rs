// src/dispatch/mod.rs
//! The dispatch loop: a bounded command queue drained by one thread that
//! owns the canvas.
//!
//! ```text
//! Poster ──┐
//! Poster ──┼──► bounded queue ──► PainterLoop ──► RenderSink
//! Painter ─┘      (capacity)       (CanvasState)    (Frame)
//! ```
//!
//! Ordering: operations take effect in dequeue order. For one producer that
//! is posting order. Concurrent producers interleave per operation; a batch
//! passed to [`Poster::post`] is not atomic with respect to other producers.
//!
//! A frame reflects every operation dequeued before its trigger and none
//! dequeued after it.

mod actor;
mod queue;
mod sink;

pub use sink::{write_ppm, ChannelSink, LogSink, PpmSink, RenderSink};

use crate::config::{Config, ShutdownPolicy};
use crate::ops::Operation;
use actor::{PainterLoop, StopSignal};
use anyhow::{anyhow, bail, Context, Result};
use log::*;
use queue::QueueSender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Counters returned by the loop thread when it exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopReport {
    /// State-changing operations applied (render triggers not included).
    pub operations_applied: usize,
    /// Frames handed to the sink.
    pub frames_rendered: usize,
    /// Operations (including triggers) dropped at shutdown.
    pub operations_discarded: usize,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PostError {
    #[error("painter loop is stopped; {not_posted} operation(s) were not posted")]
    Stopped { not_posted: usize },
}

/// Cloneable producer handle. Any number of threads may post concurrently.
///
/// The loop exits on its own once every handle that can post (all `Poster`s
/// and the `Painter` itself, see [`Painter::wait`]) is gone.
#[derive(Debug, Clone)]
pub struct Poster {
    queue: Option<QueueSender>,
    signal: Arc<StopSignal>,
}

impl Poster {
    /// Enqueue `ops` one at a time, in order, blocking whenever the queue is
    /// full. Fails once a stop has been requested or the loop has exited;
    /// operations enqueued before the failure stay queued.
    pub fn post<I>(&self, ops: I) -> Result<(), PostError>
    where
        I: IntoIterator<Item = Operation>,
    {
        let mut ops = ops.into_iter();
        let Some(queue) = &self.queue else {
            return match ops.count() {
                0 => Ok(()),
                not_posted => Err(PostError::Stopped { not_posted }),
            };
        };
        while let Some(op) = ops.next() {
            if self.signal.is_stopping() || queue.push(op).is_err() {
                return Err(PostError::Stopped {
                    not_posted: 1 + ops.count(),
                });
            }
        }
        Ok(())
    }
}

/// Handle to a running dispatch loop.
///
/// Dropping the handle stops the loop with the configured shutdown policy
/// and waits for it.
pub struct Painter {
    poster: Poster,
    shutdown_policy: ShutdownPolicy,
    thread_handle: Option<JoinHandle<LoopReport>>,
}

impl Painter {
    /// Validate `config` and start the loop thread. Frames go to `sink`.
    pub fn spawn<S: RenderSink>(config: Config, sink: S) -> Result<Self> {
        config.validate().context("Invalid painter configuration")?;
        info!(
            "Painter: Spawning loop ({}x{} canvas, queue capacity {})",
            config.canvas.width, config.canvas.height, config.queue.capacity
        );

        let (queue_tx, queue_rx) = queue::bounded(config.queue.capacity);
        let signal = Arc::new(StopSignal::default());

        let thread_signal = Arc::clone(&signal);
        let canvas = config.canvas;
        let figure = config.figure;
        let thread_handle = thread::Builder::new()
            .name("painter".to_string())
            .spawn(move || {
                let painter_loop = PainterLoop::new(canvas, &figure, sink);
                painter_loop.run(queue_rx, &thread_signal)
            })
            .context("Failed to spawn painter thread")?;

        Ok(Self {
            poster: Poster {
                queue: Some(queue_tx),
                signal,
            },
            shutdown_policy: config.shutdown.policy,
            thread_handle: Some(thread_handle),
        })
    }

    /// A new producer handle for this loop.
    pub fn poster(&self) -> Poster {
        self.poster.clone()
    }

    /// See [`Poster::post`].
    pub fn post<I>(&self, ops: I) -> Result<(), PostError>
    where
        I: IntoIterator<Item = Operation>,
    {
        self.poster.post(ops)
    }

    /// Ask the loop to stop without waiting for it.
    ///
    /// Further posts fail. With `Drain`, everything already queued is still
    /// applied; with `Discard`, the loop drops the queue at its next
    /// iteration boundary. Blocks only while the queue is full.
    pub fn request_stop(&self, policy: ShutdownPolicy) {
        info!("Painter: Stop requested ({:?})", policy);
        self.poster.signal.request(policy);
        let pushed = match &self.poster.queue {
            Some(queue) => queue.push_stop().is_ok(),
            None => false,
        };
        if !pushed {
            debug!("Painter: Loop already exited");
        }
    }

    /// Wait for the loop thread to exit and return its report.
    ///
    /// Without a prior [`request_stop`](Self::request_stop), the loop exits
    /// once every [`Poster`] has been dropped and the queue is drained.
    pub fn wait(mut self) -> Result<LoopReport> {
        self.join()
    }

    /// [`request_stop`](Self::request_stop) followed by [`wait`](Self::wait).
    pub fn stop_and_wait(self, policy: ShutdownPolicy) -> Result<LoopReport> {
        self.request_stop(policy);
        self.wait()
    }

    fn join(&mut self) -> Result<LoopReport> {
        let Some(handle) = self.thread_handle.take() else {
            bail!("Painter loop already joined");
        };
        // Our own sender must not keep the loop alive.
        self.poster.queue = None;
        let report = handle
            .join()
            .map_err(|_| anyhow!("Painter thread panicked"))?;
        info!("Painter: Loop finished: {:?}", report);
        Ok(report)
    }
}

impl Drop for Painter {
    fn drop(&mut self) {
        if self.thread_handle.is_none() {
            return;
        }
        debug!("Painter dropped while running");
        if !self.poster.signal.is_stopping() {
            self.request_stop(self.shutdown_policy);
        }
        if let Err(e) = self.join() {
            error!("Painter: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests;
