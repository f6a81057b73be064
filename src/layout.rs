//! Column-packing grid layout.
//!
//! Tables are dealt round-robin into a fixed number of grid columns. Each
//! grid column keeps its own running bottom edge, so a tall table only pushes
//! down the tables below it in the same column. Column lengths end up uneven.

use crate::measure::TableMetrics;
use crate::model::Table;
use tracing::debug;

pub struct GridLayout {
    pub(crate) metrics: TableMetrics,
    cols: usize,
    pub gap_x: f64,
    pub gap_y: f64,
    pub start_x: f64,
    pub start_y: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            metrics: TableMetrics::default(),
            cols: 3,
            gap_x: 320.0,
            gap_y: 40.0,
            start_x: 60.0,
            start_y: 60.0,
        }
    }
}

/// Lay out tables with the default grid.
pub fn layout_tables(tables: &[Table]) -> Vec<Table> {
    GridLayout::default().layout(tables)
}

impl GridLayout {
    /// Default grid with `cols` columns.
    ///
    /// # Panics
    /// If `cols` is zero.
    pub fn new(cols: usize) -> Self {
        assert!(cols > 0, "grid column count must be positive");
        Self {
            cols,
            ..Self::default()
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn metrics(&self) -> &TableMetrics {
        &self.metrics
    }

    fn column_x(&self, col: usize) -> f64 {
        self.start_x + col as f64 * self.gap_x
    }

    /// Naive grid slot for the `index`-th table, ignoring table heights.
    pub fn cell(&self, index: usize) -> (f64, f64) {
        let col = index % self.cols;
        let row = index / self.cols;
        (self.column_x(col), self.start_y + row as f64 * self.gap_y)
    }

    /// Position every table, keeping input order and all other fields.
    pub fn layout(&self, tables: &[Table]) -> Vec<Table> {
        self.layout_below(std::iter::empty(), tables)
    }

    /// Like [`layout`](Self::layout), but each grid column starts below the
    /// `existing` tables that overlap it horizontally.
    pub fn layout_below<'a>(
        &self,
        existing: impl IntoIterator<Item = &'a Table>,
        tables: &[Table],
    ) -> Vec<Table> {
        assert!(self.cols > 0, "grid column count must be positive");
        let width = self.metrics.table_width;
        let mut bottoms = vec![self.start_y; self.cols];

        for table in existing {
            let bottom = table.y + self.metrics.packed_height(table.columns.len()) + self.gap_y;
            for (col, slot) in bottoms.iter_mut().enumerate() {
                let left = self.column_x(col);
                if table.x < left + width && left < table.x + width {
                    *slot = slot.max(bottom);
                }
            }
        }

        tables
            .iter()
            .enumerate()
            .map(|(i, table)| {
                let col = i % self.cols;
                let x = self.column_x(col);
                let y = bottoms[col];
                bottoms[col] += self.metrics.packed_height(table.columns.len()) + self.gap_y;

                debug!(table = %table.name, col, x, y, "placed table");
                Table {
                    x,
                    y,
                    ..table.clone()
                }
            })
            .collect()
    }
}
