/// Fixed table geometry on the canvas.
pub struct TableMetrics {
    pub table_width: f64,
    pub header_height: f64,
    pub row_height: f64,
    pub padding: f64,
}

impl Default for TableMetrics {
    fn default() -> Self {
        Self {
            table_width: 260.0,
            header_height: 56.0,
            row_height: 24.0,
            padding: 8.0,
        }
    }
}

impl TableMetrics {
    /// Height reserved by the grid layout, every column counted whether or
    /// not it is collapsed.
    pub fn packed_height(&self, column_count: usize) -> f64 {
        self.header_height + column_count as f64 * self.row_height + self.padding
    }
}
