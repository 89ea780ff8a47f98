// src/rasterizer.rs

//! Turns a [`CanvasState`] into a [`Frame`].
//!
//! ```text
//! CanvasState  →  [materialize]  →  Frame
//!   background fill                   full-frame fill
//!   background rect (optional)        black rectangle
//!   figures (in order)                one stamp per figure
//! ```
//!
//! Fractional coordinates are scaled per axis and truncated toward zero.
//! Everything is clipped to the frame, so figures moved off the canvas are
//! simply (partly) invisible.

use crate::canvas::CanvasState;
use crate::color::Color;
use crate::config::{CanvasConfig, FigureConfig, RectOffsets};
use crate::frame::{Frame, PixelRect};

/// Scale a fractional coordinate by a pixel extent, truncating.
pub fn scale(fraction: f32, extent: u32) -> i32 {
    (fraction * extent as f32) as i32
}

/// The figure primitive: two rectangles at fixed offsets from a center
/// point, filled with one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureStamp {
    color: Color,
    bar: RectOffsets,
    stem: RectOffsets,
}

impl FigureStamp {
    pub fn new(config: &FigureConfig) -> Self {
        Self {
            color: config.color,
            bar: config.bar,
            stem: config.stem,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// The two rectangles of a figure centered at `(cx, cy)`.
    pub fn rects(&self, cx: i32, cy: i32) -> [PixelRect; 2] {
        [offset_rect(cx, cy, &self.bar), offset_rect(cx, cy, &self.stem)]
    }

    pub fn stamp(&self, frame: &mut Frame, cx: i32, cy: i32) {
        for rect in self.rects(cx, cy) {
            frame.fill_rect(rect, self.color);
        }
    }
}

impl Default for FigureStamp {
    fn default() -> Self {
        Self::new(&FigureConfig::default())
    }
}

fn offset_rect(cx: i32, cy: i32, offsets: &RectOffsets) -> PixelRect {
    PixelRect::new(
        cx.saturating_sub(offsets.left),
        cy.saturating_sub(offsets.top),
        cx.saturating_add(offsets.right),
        cy.saturating_add(offsets.bottom),
    )
}

/// Render `state` into a fresh frame of the configured size.
pub fn materialize(state: &CanvasState, canvas: &CanvasConfig, stamp: &FigureStamp) -> Frame {
    let mut frame = Frame::new(canvas.width, canvas.height, state.background_fill.color);
    for op in state.drawables() {
        op.rasterize(&mut frame, stamp);
    }
    frame
}
