// src/dispatch/actor.rs
//! PainterLoop - the single consumer that owns the canvas.
//!
//! Pulls operations from the bounded queue and applies them in order. On a
//! render trigger it materializes a frame from the current state and hands
//! it to the sink, blocking until the sink returns.
//!
//! Threading model:
//! - Owns: CanvasState, FigureStamp, the RenderSink
//! - The state is created on the loop thread and never leaves it
//! - Stop requests are observed between pulls and before materializing

use crate::canvas::CanvasState;
use crate::config::{CanvasConfig, FigureConfig, ShutdownPolicy};
use crate::dispatch::queue::{Envelope, QueueReceiver};
use crate::dispatch::sink::RenderSink;
use crate::dispatch::LoopReport;
use crate::ops::Operation;
use crate::rasterizer::{materialize, FigureStamp};
use log::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown flags shared between the loop and its handles.
#[derive(Debug, Default)]
pub(crate) struct StopSignal {
    stopping: AtomicBool,
    discard: AtomicBool,
}

impl StopSignal {
    pub(crate) fn request(&self, policy: ShutdownPolicy) {
        if policy == ShutdownPolicy::Discard {
            self.discard.store(true, Ordering::SeqCst);
        }
        self.stopping.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }

    fn discard_requested(&self) -> bool {
        self.discard.load(Ordering::SeqCst)
    }
}

pub(crate) struct PainterLoop<S: RenderSink> {
    state: CanvasState,
    canvas: CanvasConfig,
    stamp: FigureStamp,
    sink: S,
    report: LoopReport,
}

impl<S: RenderSink> PainterLoop<S> {
    pub(crate) fn new(canvas: CanvasConfig, figure: &FigureConfig, sink: S) -> Self {
        Self {
            state: CanvasState::new(),
            canvas,
            stamp: FigureStamp::new(figure),
            sink,
            report: LoopReport::default(),
        }
    }

    /// Run until stopped or until every producer is gone.
    pub(crate) fn run(mut self, queue: QueueReceiver, signal: &StopSignal) -> LoopReport {
        info!("PainterLoop: Thread started");

        loop {
            if signal.discard_requested() {
                info!("PainterLoop: Discard requested, dropping queued operations");
                self.discard_remaining(&queue);
                break;
            }

            match queue.pull() {
                Some(Envelope::Op(op)) => self.dispatch(op, signal),
                Some(Envelope::Stop) => {
                    info!("PainterLoop: Stop marker reached");
                    self.discard_remaining(&queue);
                    break;
                }
                None => {
                    info!("PainterLoop: All producers dropped, exiting");
                    break;
                }
            }
        }

        info!("PainterLoop: Thread stopped ({:?})", self.report);
        self.report
    }

    fn dispatch(&mut self, op: Operation, signal: &StopSignal) {
        match op {
            Operation::RenderTrigger => self.render(signal),
            Operation::Fill(_)
            | Operation::BackgroundRect(_)
            | Operation::Figure(_)
            | Operation::Move { .. }
            | Operation::Reset => {
                debug!("PainterLoop: Applying {:?}", op);
                op.apply(&mut self.state);
                self.report.operations_applied += 1;
            }
        }
    }

    fn render(&mut self, signal: &StopSignal) {
        if signal.discard_requested() {
            debug!("PainterLoop: Discard requested, skipping frame");
            self.report.operations_discarded += 1;
            return;
        }

        let frame = materialize(&self.state, &self.canvas, &self.stamp);
        debug!(
            "PainterLoop: Materialized frame {} ({} figures)",
            self.report.frames_rendered + 1,
            self.state.figures().len()
        );
        self.sink.update(frame);
        self.report.frames_rendered += 1;
    }

    fn discard_remaining(&mut self, queue: &QueueReceiver) {
        let discarded = queue.close();
        if discarded > 0 {
            warn!("PainterLoop: Discarded {} queued operations", discarded);
        }
        self.report.operations_discarded += discarded;
    }
}
