//! Specification Model - Canonical In-Memory Shape
//!
//! Every field here is fully typed and fully defaulted. Loosely-typed
//! document values never reach this module; see `decode` for that.

use serde::Serialize;

/// A color as written in a spec document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Color {
    Named(String),
    Rgb([i64; 3]),
    Rgba([i64; 4]),
}

impl Color {
    pub fn named(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

/// Spacing between grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Gap {
    /// Same gap on both axes
    Uniform(f64),
    /// `[x, y]`
    Axes([f64; 2]),
}

/// Space around the whole grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Margin {
    /// Same margin on all four sides
    Uniform(f64),
    /// `[vertical, horizontal]`
    Axes([f64; 2]),
    /// `[top, right, bottom, left]`
    Sides([f64; 4]),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// `[columns, rows]`
    pub grid_size: [i64; 2],
    pub gap: Gap,
    pub margin: Margin,
}

impl Layout {
    pub fn columns(&self) -> i64 {
        self.grid_size[0]
    }

    pub fn rows(&self) -> i64 {
        self.grid_size[1]
    }

    /// Number of cells on one sheet, or `None` if it does not fit an `i64`.
    pub fn grid_area(&self) -> Option<i64> {
        self.grid_size[0].checked_mul(self.grid_size[1])
    }

    pub fn gap_x(&self) -> f64 {
        match self.gap {
            Gap::Uniform(g) => g,
            Gap::Axes([x, _]) => x,
        }
    }

    pub fn gap_y(&self) -> f64 {
        match self.gap {
            Gap::Uniform(g) => g,
            Gap::Axes([_, y]) => y,
        }
    }

    pub fn margin_top(&self) -> f64 {
        match self.margin {
            Margin::Uniform(m) => m,
            Margin::Axes([v, _]) => v,
            Margin::Sides([t, _, _, _]) => t,
        }
    }

    pub fn margin_right(&self) -> f64 {
        match self.margin {
            Margin::Uniform(m) => m,
            Margin::Axes([_, h]) => h,
            Margin::Sides([_, r, _, _]) => r,
        }
    }

    pub fn margin_bottom(&self) -> f64 {
        match self.margin {
            Margin::Uniform(m) => m,
            Margin::Axes([v, _]) => v,
            Margin::Sides([_, _, b, _]) => b,
        }
    }

    pub fn margin_left(&self) -> f64 {
        match self.margin {
            Margin::Uniform(m) => m,
            Margin::Axes([_, h]) => h,
            Margin::Sides([_, _, _, l]) => l,
        }
    }

    /// Pixel size of a full sheet holding `tile_w` x `tile_h` tiles.
    pub fn sheet_size(&self, tile_w: u32, tile_h: u32) -> (i64, i64) {
        let width = (f64::from(tile_w) + self.gap_x()) * self.columns() as f64 - self.gap_x()
            + self.margin_right()
            + self.margin_left();
        let height = (f64::from(tile_h) + self.gap_y()) * self.rows() as f64 - self.gap_y()
            + self.margin_top()
            + self.margin_bottom();
        (width as i64, height as i64)
    }

    /// Top-left corner of the `index`th cell, filling rows left to right.
    ///
    /// Returns `None` for a grid with no columns.
    pub fn cell_origin(&self, index: usize, tile_w: u32, tile_h: u32) -> Option<(i64, i64)> {
        let columns = usize::try_from(self.columns()).ok().filter(|c| *c > 0)?;
        let (col, row) = (index % columns, index / columns);
        let left = self.margin_left() + col as f64 * (f64::from(tile_w) + self.gap_x());
        let top = self.margin_top() + row as f64 * (f64::from(tile_h) + self.gap_y());
        Some((left as i64, top as i64))
    }
}

/// One templated text overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSpec {
    pub template: String,
    pub position: [f64; 2],
    /// Font file; `None` means the system default font.
    pub ttf: Option<String>,
    pub size: i64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpec {
    pub background_color: Color,
}

/// Root of a stamp specification.
///
/// `params` and `table` are carried as raw document values. This engine does
/// not validate or rewrite them; `Specification::typed_params` and
/// `Specification::table_rows` interpret them on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    pub stack_size: i64,
    pub source_image: String,
    pub layout: Layout,
    pub texts: Vec<TextSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<toml::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<toml::Value>,
    pub output: OutputSpec,
    /// Sheet background. Kept apart from `output.background_color`.
    pub background: Color,
}

impl Default for Specification {
    fn default() -> Self {
        crate::defaults::reference().clone()
    }
}

impl Specification {
    /// Clamp the fields the desktop editor relies on before writing to disk.
    pub fn normalized_for_save(mut self) -> Self {
        self.stack_size = self.stack_size.max(1);
        self.layout.grid_size[0] = self.layout.grid_size[0].max(1);
        self.layout.grid_size[1] = self.layout.grid_size[1].max(1);
        if self.texts.is_empty() {
            self.texts = crate::defaults::reference().texts.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(gap: Gap, margin: Margin) -> Layout {
        Layout { grid_size: [3, 2], gap, margin }
    }

    #[test]
    fn test_margin_pair_is_vertical_then_horizontal() {
        let l = layout(Gap::Uniform(0.0), Margin::Axes([5.0, 7.0]));
        assert_eq!(l.margin_top(), 5.0);
        assert_eq!(l.margin_bottom(), 5.0);
        assert_eq!(l.margin_left(), 7.0);
        assert_eq!(l.margin_right(), 7.0);
    }

    #[test]
    fn test_margin_sides_clockwise() {
        let l = layout(Gap::Uniform(0.0), Margin::Sides([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(
            (l.margin_top(), l.margin_right(), l.margin_bottom(), l.margin_left()),
            (1.0, 2.0, 3.0, 4.0)
        );
    }

    #[test]
    fn test_sheet_size_accounts_for_gaps_and_margins() {
        let l = layout(Gap::Axes([10.0, 4.0]), Margin::Uniform(2.0));
        // 3 tiles of 100 + 2 gaps of 10 + 2 margins; 2 tiles of 50 + 1 gap of 4 + 2 margins
        assert_eq!(l.sheet_size(100, 50), (324, 108));
    }

    #[test]
    fn test_cell_origin_fills_rows_first() {
        let l = layout(Gap::Uniform(10.0), Margin::Sides([1.0, 0.0, 0.0, 3.0]));
        assert_eq!(l.cell_origin(0, 100, 50), Some((3, 1)));
        assert_eq!(l.cell_origin(2, 100, 50), Some((223, 1)));
        assert_eq!(l.cell_origin(3, 100, 50), Some((3, 61)));
    }

    #[test]
    fn test_cell_origin_without_columns() {
        let l = Layout {
            grid_size: [0, 1],
            gap: Gap::Uniform(0.0),
            margin: Margin::Uniform(0.0),
        };
        assert_eq!(l.cell_origin(0, 10, 10), None);
    }

    #[test]
    fn test_grid_area_overflow() {
        let mut l = layout(Gap::Uniform(0.0), Margin::Uniform(0.0));
        assert_eq!(l.grid_area(), Some(6));
        l.grid_size = [1 << 32, 1 << 32];
        assert_eq!(l.grid_area(), None);
    }

    #[test]
    fn test_normalized_for_save_clamps() {
        let mut spec = Specification::default();
        spec.stack_size = 0;
        spec.layout.grid_size = [-1, 4];
        spec.texts.clear();

        let spec = spec.normalized_for_save();
        assert_eq!(spec.stack_size, 1);
        assert_eq!(spec.layout.grid_size, [1, 4]);
        assert_eq!(spec.texts.len(), 1);
    }
}
