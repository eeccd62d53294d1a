//! Character grid for the layout preview
//!
//! Grows on demand, so callers can draw first and size later.

use unicode_width::UnicodeWidthChar;

use super::box_drawing::BoxChars;

/// Placeholder for the second cell of a double-width character
const WIDE_TAIL: char = '\0';

/// Character grid a preview is drawn onto
#[derive(Debug, Clone)]
pub struct AsciiCanvas {
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Vec<char>>,
}

impl AsciiCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        let grid = vec![vec![' '; width.max(1)]; height.max(1)];
        Self {
            width,
            height,
            grid,
        }
    }

    /// Ensure the canvas is at least the specified size, expanding if needed
    pub fn ensure_size(&mut self, min_width: usize, min_height: usize) {
        if min_width > self.width {
            for row in &mut self.grid {
                row.resize(min_width, ' ');
            }
            self.width = min_width;
        }
        if min_height > self.height {
            let extra_rows = min_height - self.height;
            self.grid
                .extend((0..extra_rows).map(|_| vec![' '; self.width]));
            self.height = min_height;
        }
    }

    pub fn set_char(&mut self, x: usize, y: usize, c: char) {
        self.ensure_size(x + 1, y + 1);
        self.grid[y][x] = c;
    }

    pub fn get_char(&self, x: usize, y: usize) -> char {
        if y < self.height && x < self.width {
            self.grid[y][x]
        } else {
            ' '
        }
    }

    /// Draw text left-aligned at `(x, y)`, one cell per character
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str) {
        let mut col = x;
        for c in text.chars() {
            let width = UnicodeWidthChar::width(c).unwrap_or(0).max(1);
            self.set_char(col, y, c);
            if width > 1 {
                self.set_char(col + 1, y, WIDE_TAIL);
            }
            col += width;
        }
    }

    /// Draw text centred on `center_x`
    pub fn draw_text_centered(&mut self, center_x: usize, y: usize, text: &str) {
        let columns: usize = text
            .chars()
            .map(|c| UnicodeWidthChar::width(c).unwrap_or(0).max(1))
            .sum();
        self.draw_text(center_x.saturating_sub(columns / 2), y, text);
    }

    pub fn draw_horizontal_line(&mut self, x: usize, y: usize, length: usize, c: char) {
        for i in 0..length {
            self.set_char(x + i, y, c);
        }
    }

    pub fn draw_vertical_line(&mut self, x: usize, y: usize, length: usize, c: char) {
        for i in 0..length {
            self.set_char(x, y + i, c);
        }
    }

    /// Outline a box whose top-left cell is `(x, y)`. Boxes smaller than 2x2 collapse to their corner.
    pub fn draw_box(&mut self, x: usize, y: usize, width: usize, height: usize, chars: &BoxChars) {
        if width < 2 || height < 2 {
            self.set_char(x, y, chars.top_left);
            return;
        }
        let right = x + width - 1;
        let bottom = y + height - 1;
        self.draw_horizontal_line(x + 1, y, width - 2, chars.horizontal);
        self.draw_horizontal_line(x + 1, bottom, width - 2, chars.horizontal);
        self.draw_vertical_line(x, y + 1, height - 2, chars.vertical);
        self.draw_vertical_line(right, y + 1, height - 2, chars.vertical);
        self.set_char(x, y, chars.top_left);
        self.set_char(right, y, chars.top_right);
        self.set_char(x, bottom, chars.bottom_left);
        self.set_char(right, bottom, chars.bottom_right);
    }

    /// Blank the inside of a box so nothing drawn earlier shows through
    pub fn clear_box(&mut self, x: usize, y: usize, width: usize, height: usize) {
        for row in y + 1..(y + height).saturating_sub(1) {
            for col in x + 1..(x + width).saturating_sub(1) {
                self.set_char(col, row, ' ');
            }
        }
    }

    /// Trace a straight segment between two cells, writing `c` only into blank cells
    pub fn draw_segment(&mut self, from: (usize, usize), to: (usize, usize), c: char) {
        let (x0, y0) = (from.0 as i64, from.1 as i64);
        let (x1, y1) = (to.0 as i64, to.1 as i64);
        let steps = (x1 - x0).abs().max((y1 - y0).abs());
        if steps == 0 {
            return;
        }
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = (x0 as f64 + (x1 - x0) as f64 * t).round() as usize;
            let y = (y0 as f64 + (y1 - y0) as f64 * t).round() as usize;
            if self.get_char(x, y) == ' ' {
                self.set_char(x, y, c);
            }
        }
    }
}

impl std::fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rows: Vec<String> = self
            .grid
            .iter()
            .map(|row| {
                let s: String = row.iter().filter(|c| **c != WIDE_TAIL).collect();
                s.trim_end().to_string()
            })
            .collect();

        while rows.first().is_some_and(|row| row.is_empty()) {
            rows.remove(0);
        }
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        if rows.is_empty() {
            return Ok(());
        }

        let min_indent = rows
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| row.chars().take_while(|c| *c == ' ').count())
            .min()
            .unwrap_or(0);

        if min_indent > 0 {
            for row in &mut rows {
                *row = row.chars().skip(min_indent).collect();
            }
        }

        write!(f, "{}", rows.join("\n"))
    }
}
