//! The 2D drawing surface the renderer hands polygons to

/// An opaque RGB color passed through to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Window size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A surface that rasterizes polygons.
///
/// `xs` and `ys` are parallel arrays of the same length.
pub trait DrawingSurface {
    /// Outline the closed polygon through the given points.
    fn draw_polygon(&mut self, xs: &[i32], ys: &[i32], color: Color);

    /// Fill the closed polygon through the given points.
    fn fill_polygon(&mut self, xs: &[i32], ys: &[i32], color: Color);
}

/// One polygon call captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPolygon {
    pub xs: Vec<i32>,
    pub ys: Vec<i32>,
    pub color: Color,
    pub filled: bool,
}

/// A headless surface that keeps every polygon call in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub polygons: Vec<RecordedPolygon>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, xs: &[i32], ys: &[i32], color: Color, filled: bool) {
        self.polygons.push(RecordedPolygon {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            color,
            filled,
        });
    }
}

impl DrawingSurface for RecordingSurface {
    fn draw_polygon(&mut self, xs: &[i32], ys: &[i32], color: Color) {
        self.record(xs, ys, color, false);
    }

    fn fill_polygon(&mut self, xs: &[i32], ys: &[i32], color: Color) {
        self.record(xs, ys, color, true);
    }
}
