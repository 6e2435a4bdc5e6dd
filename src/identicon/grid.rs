//! Grid geometry and the mirrored cell layout.
//!
//! Hash digits are consumed column by column, starting at the center and
//! moving outwards. Each digit past the center column lights a pair of cells
//! mirrored about the vertical axis.
//!
//! ```text
//! pixels = 5             digit index → (column, row)
//! ┌───┬───┬───┬───┬───┐
//! │10 │ 5 │ 0 │ 5 │10 │  0..5   → column 2
//! │11 │ 6 │ 1 │ 6 │11 │  5..10  → columns 1 and 3
//! │12 │ 7 │ 2 │ 7 │12 │  10..15 → columns 0 and 4
//! │13 │ 8 │ 3 │ 8 │13 │
//! │14 │ 9 │ 4 │ 9 │14 │
//! └───┴───┴───┴───┴───┘
//! ```

use serde::Serialize;

use super::color::Color;

/// Canvas layout derived from size, margin fraction and pixel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    /// Canvas side length.
    pub size: u32,
    /// Cells per side.
    pub pixels: u32,
    /// `floor(size * margin)`
    pub base_margin: u32,
    /// Side length of one cell.
    pub cell_size: u32,
    /// Margin that centers the grid after cell rounding.
    pub outer_margin: u32,
}

impl Geometry {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(size: u32, margin: f64, pixels: u32) -> Self {
        let base_margin = (f64::from(size) * margin).floor().max(0.0) as u32;
        let cell_size = size.saturating_sub(base_margin.saturating_mul(2)) / pixels.max(1);
        let outer_margin = size.saturating_sub(cell_size.saturating_mul(pixels)) / 2;

        Self {
            size,
            pixels,
            base_margin,
            cell_size,
            outer_margin,
        }
    }

    /// Cells collapse to nothing when the canvas is too small for the grid.
    pub const fn is_degenerate(&self) -> bool {
        self.cell_size == 0
    }

    /// Number of hash digits that drive the grid: `pixels * ceil(pixels / 2)`.
    pub const fn digit_count(&self) -> usize {
        self.pixels as usize * self.pixels.div_ceil(2) as usize
    }

    /// Top-left corner of the cell at `(column, row)`.
    pub fn origin(&self, column: u32, row: u32) -> (f64, f64) {
        let x = column * self.cell_size + self.outer_margin;
        let y = row * self.cell_size + self.outer_margin;
        (f64::from(x), f64::from(y))
    }

    /// Place the digit at `index`, returning its column and optional mirror column.
    pub fn columns(&self, index: usize) -> (u32, Option<u32>) {
        #[allow(clippy::cast_possible_truncation)]
        let offset = (index / self.pixels as usize) as u32;
        let half = self.pixels / 2;

        if self.pixels % 2 == 1 {
            if offset == 0 {
                (half, None)
            } else {
                (half - offset, Some(half + offset))
            }
        } else {
            (half - 1 - offset, Some(half + offset))
        }
    }

    /// Row of the digit at `index`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn row(&self, index: usize) -> u32 {
        (index % self.pixels as usize) as u32
    }
}

/// One grid position, lit or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Hash digit that decided this cell.
    pub digit: usize,
    pub column: u32,
    pub row: u32,
    /// Even digit value.
    pub on: bool,
}

/// A colored square ready to draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

/// Expand parity digits into cells, center column first then mirrored pairs.
pub fn layout(geometry: &Geometry, digits: &[u32]) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(geometry.pixels as usize * geometry.pixels as usize);

    for (index, value) in digits.iter().enumerate().take(geometry.digit_count()) {
        let on = value % 2 == 0;
        let row = geometry.row(index);
        let (column, mirror) = geometry.columns(index);

        cells.push(Cell {
            digit: index,
            column,
            row,
            on,
        });
        if let Some(column) = mirror {
            cells.push(Cell {
                digit: index,
                column,
                row,
                on,
            });
        }
    }

    cells
}

/// Turn a cell into a square of the geometry's cell size.
pub fn to_rect(geometry: &Geometry, cell: &Cell, color: Color) -> Rect {
    let (x, y) = geometry.origin(cell.column, cell.row);
    let side = f64::from(geometry.cell_size);
    Rect {
        x,
        y,
        width: side,
        height: side,
        color,
    }
}
