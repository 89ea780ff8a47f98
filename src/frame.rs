// src/frame.rs
//! Framebuffer type for rendered output.

use crate::color::Color;

/// Integer pixel rectangle, half-open: `[x0, x1) x [y0, y1)`.
///
/// Corners may be given in any order; they are normalised on construction.
/// Coordinates may lie outside any frame, fills clip against the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// A rendered canvas: `width * height` RGBA pixels, row-major.
///
/// Frames are produced by the dispatch loop and handed to a render sink,
/// which becomes the sole owner. Outside the crate a frame is read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Box<[Color]>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Create a frame with every pixel set to `color`.
    pub(crate) fn new(width: u32, height: u32, color: Color) -> Self {
        let size = (width as usize) * (height as usize);
        let data = vec![color; size].into_boxed_slice();
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[(y as usize) * (self.width as usize) + x as usize])
    }

    pub fn pixels(&self) -> &[Color] {
        &self.data
    }

    /// Copy out as RGBA bytes (4 bytes per pixel).
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for pixel in self.data.iter() {
            bytes.extend_from_slice(&pixel.to_bytes());
        }
        bytes
    }

    /// Overwrite the whole frame with `color`.
    pub(crate) fn fill(&mut self, color: Color) {
        self.data.fill(color);
    }

    /// Overwrite the part of `rect` that lies inside the frame with `color`.
    pub(crate) fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let x0 = rect.x0.clamp(0, self.width as i32) as usize;
        let x1 = rect.x1.clamp(0, self.width as i32) as usize;
        let y0 = rect.y0.clamp(0, self.height as i32) as usize;
        let y1 = rect.y1.clamp(0, self.height as i32) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width as usize;
        for row in y0..y1 {
            let row_start = row * stride;
            self.data[row_start + x0..row_start + x1].fill(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_new() {
        let frame = Frame::new(10, 20, Color::WHITE);
        assert_eq!(frame.width(), 10);
        assert_eq!(frame.height(), 20);
        assert_eq!(frame.pixels().len(), 200);
        assert!(frame.pixels().iter().all(|&p| p == Color::WHITE));
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let frame = Frame::new(4, 4, Color::BLACK);
        assert_eq!(frame.pixel(3, 3), Some(Color::BLACK));
        assert_eq!(frame.pixel(4, 0), None);
        assert_eq!(frame.pixel(0, 4), None);
    }

    #[test]
    fn test_rect_normalises_corners() {
        let rect = PixelRect::new(8, 9, 2, 3);
        assert_eq!(rect, PixelRect::new(2, 3, 8, 9));
        assert!(rect.contains(2, 3));
        assert!(!rect.contains(8, 3));
        assert!(PixelRect::new(5, 0, 5, 10).is_empty());
    }

    #[test]
    fn test_fill_rect_is_half_open() {
        let mut frame = Frame::new(10, 10, Color::WHITE);
        frame.fill_rect(PixelRect::new(2, 3, 5, 6), Color::BLACK);

        for y in 0..10 {
            for x in 0..10 {
                let expected = if (2..5).contains(&x) && (3..6).contains(&y) {
                    Color::BLACK
                } else {
                    Color::WHITE
                };
                assert_eq!(frame.pixel(x, y), Some(expected), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut frame = Frame::new(10, 10, Color::WHITE);
        frame.fill_rect(PixelRect::new(-50, -50, 3, 200), Color::GREEN);
        assert_eq!(frame.pixel(0, 0), Some(Color::GREEN));
        assert_eq!(frame.pixel(2, 9), Some(Color::GREEN));
        assert_eq!(frame.pixel(3, 0), Some(Color::WHITE));

        // Entirely outside: no-op.
        frame.fill_rect(PixelRect::new(20, 20, 30, 30), Color::BLACK);
        assert!(!frame.pixels().contains(&Color::BLACK));
    }

    #[test]
    fn test_to_rgba_bytes() {
        let frame = Frame::new(2, 1, Color::GREEN);
        assert_eq!(frame.to_rgba_bytes(), vec![0, 255, 0, 255, 0, 255, 0, 255]);
    }
}
