// src/dispatch/tests.rs

use super::*;
use crate::color::Color;
use crate::frame::Frame;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

fn config_with_capacity(capacity: usize) -> Config {
    let mut config = Config::default();
    config.queue.capacity = capacity;
    config
}

fn all_pixels(frame: &Frame, color: Color) -> bool {
    frame.pixels().iter().all(|&p| p == color)
}

/// Sink that announces each frame, then holds the loop until released.
struct GateSink {
    entered_tx: Sender<()>,
    release_rx: Receiver<()>,
    out_tx: Sender<Frame>,
}

struct Gate {
    entered_rx: Receiver<()>,
    release_tx: Sender<()>,
    out_rx: Receiver<Frame>,
}

fn gate() -> (GateSink, Gate) {
    let (entered_tx, entered_rx) = channel();
    let (release_tx, release_rx) = channel();
    let (out_tx, out_rx) = channel();
    (
        GateSink {
            entered_tx,
            release_rx,
            out_tx,
        },
        Gate {
            entered_rx,
            release_tx,
            out_rx,
        },
    )
}

impl RenderSink for GateSink {
    fn update(&mut self, frame: Frame) {
        let _ = self.entered_tx.send(());
        let _ = self.release_rx.recv();
        let _ = self.out_tx.send(frame);
    }
}

#[test_log::test]
fn it_should_render_last_fill_as_background() {
    let (sink, frames) = ChannelSink::bounded(4);
    let painter = Painter::spawn(Config::default(), sink).unwrap();

    painter
        .post([
            Operation::fill(Color::opaque(255, 100, 0)),
            Operation::fill(Color::BLACK),
            Operation::RenderTrigger,
        ])
        .unwrap();
    let report = painter.stop_and_wait(ShutdownPolicy::Drain).unwrap();

    let frames: Vec<Frame> = frames.iter().collect();
    assert_eq!(frames.len(), 1);
    assert!(all_pixels(&frames[0], Color::BLACK));
    assert_eq!(
        report,
        LoopReport {
            operations_applied: 2,
            frames_rendered: 1,
            operations_discarded: 0,
        }
    );
}

#[test_log::test]
fn it_should_render_white_before_any_operation() {
    let (sink, frames) = ChannelSink::bounded(1);
    let painter = Painter::spawn(Config::default(), sink).unwrap();
    painter.post([Operation::RenderTrigger]).unwrap();

    let frame = frames.recv().unwrap();
    assert!(all_pixels(&frame, Color::WHITE));
    painter.stop_and_wait(ShutdownPolicy::Drain).unwrap();
}

#[test_log::test]
fn it_should_snapshot_state_at_each_trigger() {
    let (sink, frames) = ChannelSink::bounded(8);
    let painter = Painter::spawn(Config::default(), sink).unwrap();

    painter
        .post([
            Operation::fill(Color::GREEN),
            Operation::RenderTrigger,
            Operation::figure(0.5, 0.5),
            Operation::RenderTrigger,
            Operation::Reset,
            Operation::RenderTrigger,
        ])
        .unwrap();
    painter.stop_and_wait(ShutdownPolicy::Drain).unwrap();

    let frames: Vec<Frame> = frames.iter().collect();
    assert_eq!(frames.len(), 3);
    assert!(all_pixels(&frames[0], Color::GREEN));
    assert_eq!(frames[1].pixel(200, 199), Some(Color::YELLOW));
    assert_eq!(frames[1].pixel(0, 399), Some(Color::GREEN));
    assert!(all_pixels(&frames[2], Color::BLACK));
}

#[test_log::test]
fn it_should_drain_everything_posted_before_stop() {
    let (sink, frames) = ChannelSink::bounded(64);
    let painter = Painter::spawn(Config::default(), sink).unwrap();

    // 40 operations through a queue of 15.
    let ops = (0..20u8).flat_map(|i| [Operation::fill(Color::opaque(i, 0, 0)), Operation::RenderTrigger]);
    painter.post(ops).unwrap();
    let report = painter.stop_and_wait(ShutdownPolicy::Drain).unwrap();

    assert_eq!(report.operations_applied, 20);
    assert_eq!(report.frames_rendered, 20);
    assert_eq!(report.operations_discarded, 0);

    let frames: Vec<Frame> = frames.iter().collect();
    for (i, frame) in frames.iter().enumerate() {
        assert!(all_pixels(frame, Color::opaque(i as u8, 0, 0)), "frame {}", i);
    }
}

#[test_log::test]
fn it_should_discard_queued_operations_on_discard_stop() {
    let (sink, gate) = gate();
    let painter = Painter::spawn(Config::default(), sink).unwrap();

    painter
        .post([
            Operation::fill(Color::GREEN),
            Operation::RenderTrigger,
            Operation::figure(0.5, 0.5),
            Operation::RenderTrigger,
        ])
        .unwrap();

    // Loop is now parked inside the sink with two operations queued.
    gate.entered_rx.recv().unwrap();
    painter.request_stop(ShutdownPolicy::Discard);
    gate.release_tx.send(()).unwrap();

    let report = painter.wait().unwrap();
    assert_eq!(
        report,
        LoopReport {
            operations_applied: 1,
            frames_rendered: 1,
            operations_discarded: 2,
        }
    );
    assert_eq!(gate.out_rx.iter().count(), 1);
}

#[test_log::test]
fn it_should_reject_posts_after_stop() {
    let (sink, _frames) = ChannelSink::bounded(1);
    let painter = Painter::spawn(Config::default(), sink).unwrap();
    let poster = painter.poster();

    painter.request_stop(ShutdownPolicy::Drain);
    assert_eq!(
        painter.post([Operation::Reset, Operation::Reset, Operation::RenderTrigger]),
        Err(PostError::Stopped { not_posted: 3 })
    );
    assert_eq!(
        poster.post([Operation::Reset]),
        Err(PostError::Stopped { not_posted: 1 })
    );

    let report = painter.wait().unwrap();
    assert_eq!(report, LoopReport::default());
}

#[test_log::test]
fn it_should_throttle_producers_behind_a_slow_sink() {
    let (sink, gate) = gate();
    let painter = Painter::spawn(config_with_capacity(2), sink).unwrap();

    painter.post([Operation::RenderTrigger]).unwrap();
    gate.entered_rx.recv().unwrap();

    // Loop is blocked in the sink: two posts fill the queue, a third stalls.
    painter.post([Operation::Reset, Operation::Reset]).unwrap();
    let done = Arc::new(AtomicBool::new(false));
    let producer = {
        let poster = painter.poster();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            poster.post([Operation::Reset]).unwrap();
            done.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!done.load(Ordering::SeqCst), "producer should be blocked");

    gate.release_tx.send(()).unwrap();
    producer.join().unwrap();
    assert!(done.load(Ordering::SeqCst));

    let report = painter.stop_and_wait(ShutdownPolicy::Drain).unwrap();
    assert_eq!(report.operations_applied, 3);
    assert_eq!(report.frames_rendered, 1);
}

#[test_log::test]
fn it_should_apply_operations_from_concurrent_producers() {
    let (sink, frames) = ChannelSink::bounded(1);
    let painter = Painter::spawn(config_with_capacity(4), sink).unwrap();

    let producers: Vec<_> = (0..4)
        .map(|_| {
            let poster = painter.poster();
            thread::spawn(move || {
                let ops = (0..25).map(|i| Operation::figure(i as f32 / 25.0, 0.5));
                poster.post(ops).unwrap();
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    painter.post([Operation::RenderTrigger]).unwrap();
    let report = painter.stop_and_wait(ShutdownPolicy::Drain).unwrap();
    assert_eq!(report.operations_applied, 100);
    assert_eq!(frames.iter().count(), 1);
}

#[test_log::test]
fn it_should_drain_on_drop_with_default_policy() {
    let (sink, frames) = ChannelSink::bounded(2);
    let painter = Painter::spawn(Config::default(), sink).unwrap();
    painter
        .post([Operation::fill(Color::GREEN), Operation::RenderTrigger])
        .unwrap();
    drop(painter);

    let frames: Vec<Frame> = frames.iter().collect();
    assert_eq!(frames.len(), 1);
    assert!(all_pixels(&frames[0], Color::GREEN));
}

#[test_log::test]
fn it_should_discard_on_drop_with_configured_discard_policy() {
    let mut config = Config::default();
    config.shutdown.policy = ShutdownPolicy::Discard;
    let (sink, gate) = gate();
    let painter = Painter::spawn(config, sink).unwrap();
    painter
        .post([
            Operation::fill(Color::GREEN),
            Operation::RenderTrigger,
            Operation::figure(0.5, 0.5),
            Operation::RenderTrigger,
        ])
        .unwrap();
    gate.entered_rx.recv().unwrap();

    // Drop blocks on the join, so it runs off the test thread.
    let signal = Arc::clone(&painter.poster.signal);
    let dropper = thread::spawn(move || drop(painter));
    while !signal.is_stopping() {
        thread::yield_now();
    }
    gate.release_tx.send(()).unwrap();
    dropper.join().unwrap();

    let frames: Vec<Frame> = gate.out_rx.iter().collect();
    assert_eq!(frames.len(), 1);
    assert!(all_pixels(&frames[0], Color::GREEN));
}

#[test_log::test]
fn it_should_finish_waiting_once_every_poster_is_dropped() {
    let (sink, frames) = ChannelSink::bounded(1);
    let painter = Painter::spawn(Config::default(), sink).unwrap();

    let poster = painter.poster();
    let producer = thread::spawn(move || {
        poster
            .post([Operation::fill(Color::GREEN), Operation::RenderTrigger])
            .unwrap();
    });
    producer.join().unwrap();

    let frame = frames.recv().unwrap();
    assert!(all_pixels(&frame, Color::GREEN));

    let report = painter.wait().unwrap();
    assert_eq!(
        report,
        LoopReport {
            operations_applied: 1,
            frames_rendered: 1,
            operations_discarded: 0,
        }
    );
}

#[test_log::test]
fn it_should_use_configured_canvas_size() {
    let mut config = Config::default();
    config.canvas.width = 40;
    config.canvas.height = 20;
    let (sink, frames) = ChannelSink::bounded(1);
    let painter = Painter::spawn(config, sink).unwrap();

    painter.post([Operation::RenderTrigger]).unwrap();
    let frame = frames.recv().unwrap();
    assert_eq!((frame.width(), frame.height()), (40, 20));
    painter.stop_and_wait(ShutdownPolicy::Drain).unwrap();
}

#[test_log::test]
fn it_should_refuse_to_spawn_with_zero_capacity() {
    let (sink, _frames) = ChannelSink::bounded(1);
    assert!(Painter::spawn(config_with_capacity(0), sink).is_err());
}
