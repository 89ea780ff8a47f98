// src/ops.rs

//! The closed set of drawing and control operations.
//!
//! Every operation knows how it changes a [`CanvasState`]. The drawable
//! payloads (`Fill`, `BackgroundRect`, `Figure`) also know how to paint
//! themselves onto a [`Frame`]. Arguments are assumed valid: range and
//! arity checks belong to whoever constructs the operation (see
//! [`crate::lang`]), so `apply` and `rasterize` cannot fail.

use crate::canvas::CanvasState;
use crate::color::Color;
use crate::frame::{Frame, PixelRect};
use crate::rasterizer::{scale, FigureStamp};

/// Background color for the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
}

impl Fill {
    pub fn rasterize(&self, frame: &mut Frame) {
        frame.fill(self.color);
    }
}

/// Black rectangle drawn over the background. Corners are fractions of the
/// canvas size, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BackgroundRect {
    /// Pixel rectangle for a frame of the given size.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        PixelRect::new(
            scale(self.x1, width),
            scale(self.y1, height),
            scale(self.x2, width),
            scale(self.y2, height),
        )
    }

    pub fn rasterize(&self, frame: &mut Frame) {
        let rect = self.to_pixels(frame.width(), frame.height());
        frame.fill_rect(rect, Color::BLACK);
    }
}

/// A figure centered at a fractional canvas position. `Move` shifts it, so
/// the position may leave `[0, 1]` after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub x: f32,
    pub y: f32,
}

impl Figure {
    /// Pixel center for a frame of the given size.
    pub fn center(&self, width: u32, height: u32) -> (i32, i32) {
        (scale(self.x, width), scale(self.y, height))
    }

    pub fn rasterize(&self, frame: &mut Frame, stamp: &FigureStamp) {
        let (cx, cy) = self.center(frame.width(), frame.height());
        stamp.stamp(frame, cx, cy);
    }
}

/// One typed command for the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Replace the background fill.
    Fill(Fill),
    /// Replace the background rectangle (last write wins).
    BackgroundRect(BackgroundRect),
    /// Append a figure.
    Figure(Figure),
    /// Shift every existing figure by a fractional delta.
    Move { dx: f32, dy: f32 },
    /// Black background, no rectangle, no figures.
    Reset,
    /// Render the current state into a frame. Leaves the state untouched.
    RenderTrigger,
}

impl Operation {
    pub fn fill(color: Color) -> Self {
        Operation::Fill(Fill { color })
    }

    pub fn background_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Operation::BackgroundRect(BackgroundRect { x1, y1, x2, y2 })
    }

    pub fn figure(x: f32, y: f32) -> Self {
        Operation::Figure(Figure { x, y })
    }

    pub fn move_by(dx: f32, dy: f32) -> Self {
        Operation::Move { dx, dy }
    }

    /// Apply this operation's effect to `state`.
    pub fn apply(&self, state: &mut CanvasState) {
        match *self {
            Operation::Fill(fill) => state.background_fill = fill,
            Operation::BackgroundRect(rect) => state.background_rect = Some(rect),
            Operation::Figure(figure) => state.figures.push(figure),
            Operation::Move { dx, dy } => {
                for figure in state.figures.iter_mut() {
                    figure.x += dx;
                    figure.y += dy;
                }
            }
            Operation::Reset => state.reset(),
            Operation::RenderTrigger => {}
        }
    }

    /// Paint a drawable operation onto `frame`. Non-drawable kinds are no-ops.
    pub fn rasterize(&self, frame: &mut Frame, stamp: &FigureStamp) {
        match self {
            Operation::Fill(fill) => fill.rasterize(frame),
            Operation::BackgroundRect(rect) => rect.rasterize(frame),
            Operation::Figure(figure) => figure.rasterize(frame, stamp),
            Operation::Move { .. } | Operation::Reset | Operation::RenderTrigger => {}
        }
    }
}
