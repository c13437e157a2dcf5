//! Table Layout
//!
//! Tables on slides use a uniform grid: every column is the box width divided
//! by the column count, every row (the header row included) the box height
//! divided by the row count.

use deck_model::Bounds;

/// Horizontal padding between a cell edge and its text
pub const CELL_PADDING: f64 = 8.0;

/// Fraction of the font size between the row centre and the text baseline
const BASELINE_CENTER_OFFSET: f64 = 0.35;

/// A straight separator line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separator {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Uniform grid geometry for a table element
#[derive(Debug, Clone, PartialEq)]
pub struct TableGeometry {
    pub bounds: Bounds,
    pub columns: usize,
    /// Row count including the header row
    pub rows: usize,
    pub column_width: f64,
    pub row_height: f64,
}

impl TableGeometry {
    /// Build the grid for `columns` columns, one header row and `data_rows` rows
    pub fn new(bounds: Bounds, columns: usize, data_rows: usize) -> Self {
        let columns = columns.max(1);
        let rows = data_rows + 1;
        Self {
            bounds,
            columns,
            rows,
            column_width: bounds.width / columns as f64,
            row_height: bounds.height / rows as f64,
        }
    }

    /// Grid for a header list and its data rows; ragged rows widen the grid
    pub fn for_content(bounds: Bounds, headers: &[String], rows: &[Vec<String>]) -> Self {
        let columns = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);
        Self::new(bounds, columns, rows.len())
    }

    pub fn row_rect(&self, row: usize) -> Bounds {
        Bounds::new(
            self.bounds.x,
            self.bounds.y + row as f64 * self.row_height,
            self.bounds.width,
            self.row_height,
        )
    }

    pub fn cell_rect(&self, row: usize, column: usize) -> Bounds {
        Bounds::new(
            self.bounds.x + column as f64 * self.column_width,
            self.bounds.y + row as f64 * self.row_height,
            self.column_width,
            self.row_height,
        )
    }

    /// Left-aligned, vertically centred text origin of a cell as `(x, baseline)`
    pub fn text_origin(&self, row: usize, column: usize, font_size: f64) -> (f64, f64) {
        let cell = self.cell_rect(row, column);
        (
            cell.x + CELL_PADDING,
            cell.y + cell.height / 2.0 + font_size * BASELINE_CENTER_OFFSET,
        )
    }

    /// Width available to cell text
    pub fn text_width(&self) -> f64 {
        (self.column_width - 2.0 * CELL_PADDING).max(0.0)
    }

    /// Interior vertical lines between columns
    pub fn column_separators(&self) -> Vec<Separator> {
        (1..self.columns)
            .map(|i| {
                let x = self.bounds.x + i as f64 * self.column_width;
                Separator {
                    from: (x, self.bounds.y),
                    to: (x, self.bounds.bottom()),
                }
            })
            .collect()
    }

    /// Interior horizontal lines between rows
    pub fn row_separators(&self) -> Vec<Separator> {
        (1..self.rows)
            .map(|i| {
                let y = self.bounds.y + i as f64 * self.row_height;
                Separator {
                    from: (self.bounds.x, y),
                    to: (self.bounds.right(), y),
                }
            })
            .collect()
    }
}
