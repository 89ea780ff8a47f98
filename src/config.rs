// src/config.rs

//! Defines the configuration structures for the painter.
//!
//! The configuration is deserialized from a JSON file. Every section carries
//! `#[serde(default)]`, so a file only needs to name the values it changes.
//! Defaults reproduce the reference behaviour: a 400x400 canvas, a queue of
//! 15 operations, and the fixed two-rectangle figure.
//!
//! Nothing here is global. The loaded `Config` is handed to
//! [`Painter::spawn`](crate::dispatch::Painter::spawn), which passes the
//! relevant sections on to the rasterizer.

use anyhow::{ensure, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Color;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "PAINTER_CONFIG";

/// Largest canvas width or height. Pixel coordinates are `i32`.
pub const MAX_CANVAS_EXTENT: u32 = i32::MAX as u32;

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Frame dimensions.
    pub canvas: CanvasConfig,
    /// Command queue settings.
    pub queue: QueueConfig,
    /// Figure stamp geometry and color.
    pub figure: FigureConfig,
    /// What happens to queued operations at shutdown.
    pub shutdown: ShutdownConfig,
}

impl Config {
    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `$PAINTER_CONFIG`, or the defaults when unset.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                Self::from_file(path)
            }
            None => {
                info!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Rejects values the dispatch loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.canvas.width > 0 && self.canvas.height > 0,
            "canvas must be at least 1x1 pixels, got {}x{}",
            self.canvas.width,
            self.canvas.height
        );
        ensure!(
            self.canvas.width <= MAX_CANVAS_EXTENT && self.canvas.height <= MAX_CANVAS_EXTENT,
            "canvas may be at most {}x{} pixels, got {}x{}",
            MAX_CANVAS_EXTENT,
            MAX_CANVAS_EXTENT,
            self.canvas.width,
            self.canvas.height
        );
        ensure!(
            self.queue.capacity > 0,
            "queue capacity must be at least 1"
        );
        Ok(())
    }
}

// --- Canvas ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Frame width in pixels. Fractional x coordinates scale by this.
    pub width: u32,
    /// Frame height in pixels. Fractional y coordinates scale by this.
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: 400,
            height: 400,
        }
    }
}

// --- Queue ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of operations waiting for the loop. Producers block
    /// once this many are queued.
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig { capacity: 15 }
    }
}

// --- Figure ---

/// Offsets of one rectangle of the figure, in pixels, relative to the
/// figure's center. The rectangle spans `[x - left, x + right)` by
/// `[y - top, y + bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectOffsets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub color: Color,
    /// The wide horizontal rectangle, sitting above the center.
    pub bar: RectOffsets,
    /// The narrow vertical rectangle.
    pub stem: RectOffsets,
}

impl Default for FigureConfig {
    fn default() -> Self {
        FigureConfig {
            color: Color::YELLOW,
            bar: RectOffsets {
                left: 225,
                top: 175,
                right: 225,
                bottom: 0,
            },
            stem: RectOffsets {
                left: 75,
                top: 175,
                right: 75,
                bottom: 250,
            },
        }
    }
}

// --- Shutdown ---

/// Policy for operations still queued when the loop is asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Apply everything posted before the stop request, rendering any
    /// triggers among it, then exit.
    #[default]
    Drain,
    /// Exit at the next iteration boundary and drop whatever is queued.
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShutdownConfig {
    pub policy: ShutdownPolicy,
}
