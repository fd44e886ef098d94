use crate::error::StoreCatalogError;
use crate::spreadsheet::cell::Cell;
use crate::table::Table;
use crate::table::Value;

/// Cells collected from one worksheet, in document order.
pub(crate) struct Sheet {
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Actual data range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell, widening the data range to include it.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|lower| row < lower).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|upper| upper < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|lower| col < lower).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|upper| upper < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Builds a table from the cells: the first row holding data is the
    /// header, later rows become records. Rows without any cell are skipped.
    pub(crate) fn into_table(mut self, shared_strings: &[String]) -> Result<Table, StoreCatalogError> {
        let (Some(header_row), Some(col_lower), Some(col_upper)) =
            (self.row_lower_bound, self.col_lower_bound, self.col_upper_bound)
        else {
            return Ok(Table::new(&self.name, Vec::new()));
        };

        // cells may be written out of order
        self.cells.sort_by_key(|cell| (cell.row, cell.col));

        let width = col_upper - col_lower + 1;
        let mut columns: Vec<String> = (0..width).map(|index| format!("column{}", index + 1)).collect();
        let mut table_rows: Vec<Vec<Value>> = Vec::new();
        let mut current_row = None::<usize>;
        for cell in &self.cells {
            let value = cell.to_value(&self.name, shared_strings)?;
            let offset = cell.col - col_lower;
            if cell.row == header_row {
                if !value.is_blank() {
                    columns[offset] = value.to_text();
                }
                continue;
            }
            if current_row != Some(cell.row) {
                current_row = Some(cell.row);
                table_rows.push(vec![Value::Null; width]);
            }
            if let Some(record) = table_rows.last_mut() {
                record[offset] = value;
            }
        }

        let mut table = Table::new(&self.name, columns);
        for record in table_rows {
            table.push(record);
        }
        Ok(table)
    }
}
