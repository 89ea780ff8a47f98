// src/canvas.rs

//! The persistent model of everything currently drawn.

use crate::color::Color;
use crate::ops::{BackgroundRect, Figure, Fill, Operation};

/// What is currently drawn: background fill, optional black background
/// rectangle, and figures in insertion order.
///
/// The dispatch loop creates its `CanvasState` on its own thread and never
/// hands out a reference to it, so it needs no locking. The only way to
/// change a state is [`Operation::apply`](crate::ops::Operation::apply).
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    pub(crate) background_fill: Fill,
    pub(crate) background_rect: Option<BackgroundRect>,
    pub(crate) figures: Vec<Figure>,
}

impl CanvasState {
    /// A fresh canvas: white background, no rectangle, no figures.
    pub fn new() -> Self {
        Self {
            background_fill: Fill {
                color: Color::WHITE,
            },
            background_rect: None,
            figures: Vec::new(),
        }
    }

    pub fn background_fill(&self) -> Fill {
        self.background_fill
    }

    pub fn background_rect(&self) -> Option<BackgroundRect> {
        self.background_rect
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    /// The drawable operations that reproduce this state, in paint order:
    /// the fill, the background rectangle if any, then each figure.
    pub fn drawables(&self) -> impl Iterator<Item = Operation> + '_ {
        std::iter::once(Operation::Fill(self.background_fill))
            .chain(self.background_rect.map(Operation::BackgroundRect))
            .chain(self.figures.iter().copied().map(Operation::Figure))
    }

    /// State after a `Reset`. The background is black here, unlike the
    /// white of [`CanvasState::new`].
    pub(crate) fn reset(&mut self) {
        self.background_fill = Fill {
            color: Color::BLACK,
        };
        self.background_rect = None;
        self.figures.clear();
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}
