/// Double-buffered character canvas for terminal rendering
use crossterm::{
    cursor,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use obsidian_core::{Color, DrawingSurface};
use std::io::Write;

/// Glyph used for outlines, lines and single pixels
const STROKE_GLYPH: char = '*';

// Cohen-Sutherland region codes
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

fn to_terminal(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// A grid of cells where one cell is one pixel.
///
/// Drawing goes to the back buffer; `present` writes the cells that changed
/// since the previous present and makes the back buffer the new front.
pub struct AsciiCanvas {
    width: usize,
    height: usize,
    background: Color,
    back: Vec<Cell>,
    front: Vec<Cell>,
    full_redraw: bool,
}

impl AsciiCanvas {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        let blank = Cell {
            ch: ' ',
            fg: background,
            bg: background,
        };
        Self {
            width,
            height,
            background,
            back: vec![blank; width * height],
            front: vec![blank; width * height],
            full_redraw: true,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.back[y * self.width + x])
        } else {
            None
        }
    }

    /// Color used by `clear` from now on.
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Reallocate both buffers; the next present redraws everything.
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height, self.background);
    }

    /// Reset the back buffer to the background color.
    pub fn clear(&mut self) {
        self.fill_frame(self.background);
    }

    /// Paint every cell with `color`.
    pub fn fill_frame(&mut self, color: Color) {
        for cell in &mut self.back {
            *cell = Cell {
                ch: ' ',
                fg: color,
                bg: color,
            };
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            let cell = &mut self.back[idx];
            cell.ch = STROKE_GLYPH;
            cell.fg = color;
        }
    }

    fn fill_cell(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.back[idx] = Cell {
                ch: ' ',
                fg: color,
                bg: color,
            };
        }
    }

    fn outcode(&self, x: f64, y: f64) -> u8 {
        let mut code = 0;
        if x < 0.0 {
            code |= LEFT;
        } else if x > self.width as f64 - 1.0 {
            code |= RIGHT;
        }
        if y < 0.0 {
            code |= TOP;
        } else if y > self.height as f64 - 1.0 {
            code |= BOTTOM;
        }
        code
    }

    /// Cohen-Sutherland clip of a segment to the canvas
    fn clip_line(
        &self,
        mut p0: (f64, f64),
        mut p1: (f64, f64),
    ) -> Option<((i64, i64), (i64, i64))> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let (max_x, max_y) = (self.width as f64 - 1.0, self.height as f64 - 1.0);
        let mut code0 = self.outcode(p0.0, p0.1);
        let mut code1 = self.outcode(p1.0, p1.1);

        loop {
            if code0 | code1 == 0 {
                let round = |p: (f64, f64)| (p.0.round() as i64, p.1.round() as i64);
                return Some((round(p0), round(p1)));
            }
            if code0 & code1 != 0 {
                return None;
            }

            let out = if code0 != 0 { code0 } else { code1 };
            let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
            let clipped = if out & TOP != 0 {
                (p0.0 + dx * (0.0 - p0.1) / dy, 0.0)
            } else if out & BOTTOM != 0 {
                (p0.0 + dx * (max_y - p0.1) / dy, max_y)
            } else if out & LEFT != 0 {
                (0.0, p0.1 + dy * (0.0 - p0.0) / dx)
            } else {
                (max_x, p0.1 + dy * (max_x - p0.0) / dx)
            };

            if out == code0 {
                p0 = clipped;
                code0 = self.outcode(p0.0, p0.1);
            } else {
                p1 = clipped;
                code1 = self.outcode(p1.0, p1.1);
            }
        }
    }

    /// Bresenham line between two points, endpoints included
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let clipped = self.clip_line(
            (f64::from(x0), f64::from(y0)),
            (f64::from(x1), f64::from(y1)),
        );
        let Some(((mut x, mut y), (x1, y1))) = clipped else {
            return;
        };
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.draw_pixel(x as i32, y as i32, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_pixel_wide(&mut self, x: i64, y: i64, color: Color) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.draw_pixel(x, y, color);
        }
    }

    /// Whether the box `center ± radius` misses the canvas entirely
    fn oval_off_canvas(&self, cx: i64, cy: i64, rx: i64, ry: i64) -> bool {
        cx + rx < 0 || cy + ry < 0 || cx - rx >= self.width as i64 || cy - ry >= self.height as i64
    }

    /// Midpoint ellipse outline centered on `(x, y)`
    pub fn draw_oval(&mut self, x: i32, y: i32, x_radius: i32, y_radius: i32, color: Color) {
        let (cx, cy) = (i64::from(x), i64::from(y));
        let (rx, ry) = (i64::from(x_radius), i64::from(y_radius));
        if rx < 0 || ry < 0 || self.oval_off_canvas(cx, cy, rx, ry) {
            return;
        }
        if rx == 0 || ry == 0 {
            let clamp = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
            self.draw_line(clamp(cx - rx), clamp(cy - ry), clamp(cx + rx), clamp(cy + ry), color);
            return;
        }

        let (rx2, ry2) = ((rx * rx) as f64, (ry * ry) as f64);
        let (mut px, mut py) = (0i64, ry);
        let plot = |canvas: &mut Self, px: i64, py: i64| {
            canvas.draw_pixel_wide(cx + px, cy + py, color);
            canvas.draw_pixel_wide(cx - px, cy + py, color);
            canvas.draw_pixel_wide(cx + px, cy - py, color);
            canvas.draw_pixel_wide(cx - px, cy - py, color);
        };

        // Region 1: slope shallower than -1
        let mut dx = 0.0;
        let mut dy = 2.0 * rx2 * py as f64;
        let mut d1 = ry2 - rx2 * ry as f64 + 0.25 * rx2;
        while dx < dy {
            plot(self, px, py);
            px += 1;
            dx += 2.0 * ry2;
            if d1 < 0.0 {
                d1 += dx + ry2;
            } else {
                py -= 1;
                dy -= 2.0 * rx2;
                d1 += dx - dy + ry2;
            }
        }

        // Region 2: steeper part down to the x axis
        let mut d2 = ry2 * (px as f64 + 0.5).powi(2) + rx2 * ((py - 1) as f64).powi(2) - rx2 * ry2;
        while py >= 0 {
            plot(self, px, py);
            py -= 1;
            dy -= 2.0 * rx2;
            if d2 > 0.0 {
                d2 += rx2 - dy;
            } else {
                px += 1;
                dx += 2.0 * ry2;
                d2 += dx - dy + rx2;
            }
        }
    }

    /// Filled ellipse centered on `(x, y)`, one span per row
    pub fn fill_oval(&mut self, x: i32, y: i32, x_radius: i32, y_radius: i32, color: Color) {
        let (cx, cy) = (i64::from(x), i64::from(y));
        let (rx, ry) = (i64::from(x_radius), i64::from(y_radius));
        if rx < 0 || ry < 0 || self.oval_off_canvas(cx, cy, rx, ry) {
            return;
        }

        let first_row = (cy - ry).max(0);
        let last_row = (cy + ry).min(self.height as i64 - 1);
        for row in first_row..=last_row {
            let half = if ry == 0 {
                rx
            } else {
                let t = (row - cy) as f64 / ry as f64;
                (rx as f64 * (1.0 - t * t).max(0.0).sqrt()).floor() as i64
            };
            let start = (cx - half).max(0);
            let end = (cx + half).min(self.width as i64 - 1);
            for col in start..=end {
                self.fill_cell(col as i32, row as i32, color);
            }
        }
    }

    /// Write `text` starting at `(x, y)`, clipped to the canvas.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        for (offset, ch) in text.chars().enumerate() {
            if let Some(idx) = self.index(x.saturating_add(offset as i32), y) {
                let cell = &mut self.back[idx];
                cell.ch = ch;
                cell.fg = color;
            }
        }
    }

    /// Write changed cells to `writer` and swap buffers. Returns the number
    /// of cells written.
    pub fn present<W: Write>(&mut self, writer: &mut W) -> std::io::Result<usize> {
        let mut written = 0;
        let mut last: Option<(Color, Color)> = None;

        for (idx, cell) in self.back.iter().enumerate() {
            if !self.full_redraw && self.front[idx] == *cell {
                continue;
            }

            let (x, y) = (idx % self.width, idx / self.width);
            writer.queue(cursor::MoveTo(x as u16, y as u16))?;
            if last != Some((cell.fg, cell.bg)) {
                writer.queue(SetForegroundColor(to_terminal(cell.fg)))?;
                writer.queue(SetBackgroundColor(to_terminal(cell.bg)))?;
                last = Some((cell.fg, cell.bg));
            }
            writer.queue(Print(cell.ch))?;
            written += 1;
        }
        writer.queue(ResetColor)?;

        self.front.copy_from_slice(&self.back);
        self.full_redraw = false;
        Ok(written)
    }
}

impl DrawingSurface for AsciiCanvas {
    fn draw_polygon(&mut self, xs: &[i32], ys: &[i32], color: Color) {
        if xs.len() != ys.len() || xs.is_empty() {
            return;
        }
        let n = xs.len();
        if n == 1 {
            self.draw_pixel(xs[0], ys[0], color);
            return;
        }
        for i in 0..n {
            let j = (i + 1) % n;
            self.draw_line(xs[i], ys[i], xs[j], ys[j], color);
        }
    }

    /// Even-odd scanline fill sampled at cell centers
    fn fill_polygon(&mut self, xs: &[i32], ys: &[i32], color: Color) {
        if xs.len() != ys.len() || xs.len() < 3 {
            return;
        }

        let min_y = ys.iter().copied().min().unwrap_or(0).max(0);
        let max_y = ys
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .min(self.height as i32 - 1);

        let n = xs.len();
        let mut crossings: Vec<f64> = Vec::with_capacity(n);
        for y in min_y..=max_y {
            let py = f64::from(y) + 0.5;
            crossings.clear();

            for i in 0..n {
                let j = (i + 1) % n;
                let (x0, y0) = (f64::from(xs[i]), f64::from(ys[i]));
                let (x1, y1) = (f64::from(xs[j]), f64::from(ys[j]));
                if (y0 <= py && py < y1) || (y1 <= py && py < y0) {
                    crossings.push(x0 + (py - y0) * (x1 - x0) / (y1 - y0));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil().max(0.0) as i32;
                let end = ((pair[1] - 0.5).ceil() as i32).min(self.width as i32);
                for x in start..end {
                    self.fill_cell(x, y, color);
                }
            }
        }
    }
}
