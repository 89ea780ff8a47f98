//! Painter library crate.
//!
//! A command-processing engine for a 2-D canvas: typed [`ops::Operation`]s
//! are posted to a bounded queue, a single loop thread applies them to the
//! canvas it owns, and every render trigger produces a [`frame::Frame`] for a
//! [`dispatch::RenderSink`]. The [`lang`] module parses the textual command
//! language into operations.

pub mod canvas;
pub mod color;
pub mod config;
pub mod dispatch;
pub mod frame;
pub mod lang;
pub mod ops;
pub mod rasterizer;

pub use canvas::CanvasState;
pub use color::Color;
pub use config::{Config, ShutdownPolicy};
pub use dispatch::{LoopReport, Painter, PostError, Poster, RenderSink};
pub use frame::Frame;
pub use lang::{ParseError, Parser};
pub use ops::Operation;
