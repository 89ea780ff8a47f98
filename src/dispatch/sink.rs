// src/dispatch/sink.rs
//! Render sinks: where finished frames go.
//!
//! The painter loop calls [`RenderSink::update`] synchronously, once per
//! render trigger, and does not pull the next operation until it returns.
//! A slow sink therefore throttles the loop, and through the bounded queue,
//! every producer.

use crate::frame::Frame;
use anyhow::{Context, Result};
use log::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

/// Receives completed frames. Ownership of each frame moves into the sink.
pub trait RenderSink: Send + 'static {
    fn update(&mut self, frame: Frame);
}

impl RenderSink for Box<dyn RenderSink> {
    fn update(&mut self, frame: Frame) {
        (**self).update(frame);
    }
}

/// Forwards frames into a bounded channel.
///
/// With capacity 0 every hand-off is a rendezvous with the receiver; a
/// larger capacity decouples render cadence from dispatch cadence by up to
/// that many frames.
pub struct ChannelSink {
    tx: SyncSender<Frame>,
}

impl ChannelSink {
    pub fn bounded(capacity: usize) -> (Self, Receiver<Frame>) {
        let (tx, rx) = sync_channel(capacity);
        (Self { tx }, rx)
    }
}

impl RenderSink for ChannelSink {
    fn update(&mut self, frame: Frame) {
        if let Err(e) = self.tx.send(frame) {
            warn!("ChannelSink: Receiver closed, dropping frame: {}", e);
        }
    }
}

/// Writes each frame to `<dir>/frame-NNNN.ppm` (binary PPM, alpha dropped).
pub struct PpmSink {
    dir: PathBuf,
    frames_written: usize,
}

impl PpmSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(Self {
            dir,
            frames_written: 0,
        })
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame-{:04}.ppm", index))
    }
}

impl RenderSink for PpmSink {
    fn update(&mut self, frame: Frame) {
        let path = self.frame_path(self.frames_written + 1);
        match write_ppm(&path, &frame) {
            Ok(()) => {
                self.frames_written += 1;
                info!("PpmSink: Wrote {}", path.display());
            }
            Err(e) => error!("PpmSink: Failed to write {}: {:#}", path.display(), e),
        }
    }
}

/// Save frame to binary PPM format.
pub fn write_ppm(path: &Path, frame: &Frame) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    write!(out, "P6\n{} {}\n255\n", frame.width(), frame.height())?;
    for pixel in frame.pixels() {
        out.write_all(&[pixel.r, pixel.g, pixel.b])?;
    }
    out.flush()?;
    Ok(())
}

/// Logs each frame and keeps nothing.
#[derive(Debug, Default)]
pub struct LogSink {
    frames_seen: usize,
}

impl RenderSink for LogSink {
    fn update(&mut self, frame: Frame) {
        self.frames_seen += 1;
        info!(
            "LogSink: Frame {} ({}x{})",
            self.frames_seen,
            frame.width(),
            frame.height()
        );
    }
}
