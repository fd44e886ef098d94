use crate::error::StoreCatalogError;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::SpreadsheetError;
use crate::table::Value;

/// Types of cell data in worksheet XML, from the `t` attribute of `<c>`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as "0"/"1"
    Boolean,
    /// Numeric values, including date serials
    Number,
    /// ISO 8601 date/time strings (`t="d"`)
    IsoDateTime,
    /// Inline or formula result strings
    InlineString,
    /// Index into the shared string table
    SharedString,
    /// Error values such as `#N/A`
    Error,
}

impl CellType {
    /// Maps the `t` attribute of a cell to its type. A missing attribute means number.
    pub(crate) fn parse(t: Option<&str>, error_as_null: bool) -> Self {
        match t {
            Some("inlineStr") | Some("str") => Self::InlineString,
            Some("s") => Self::SharedString,
            Some("d") => Self::IsoDateTime,
            Some("b") => Self::Boolean,
            Some("e") if error_as_null => Self::Empty,
            Some("e") => Self::Error,
            _ => Self::Number,
        }
    }
}

/// Represents a single non-empty cell with its position, type, and raw value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw text of `<v>` or `<is>`
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Resolves the raw cell content into a table value.
    pub(crate) fn to_value(&self, sheet_name: &str, shared_strings: &[String]) -> Result<Value, StoreCatalogError> {
        let invalid = |message: String| SpreadsheetError::CellValueError(sheet_name.to_owned(), self.reference(), message);
        let value = match self.kind {
            CellType::Empty => Value::Null,
            CellType::Boolean => Value::Boolean(self.value == "1"),
            CellType::Number => self
                .value
                .trim()
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| invalid(format!("parse '{}' to number failed", self.value)))?,
            CellType::IsoDateTime => Value::Text(self.value.replace('T', " ")),
            CellType::InlineString => Value::Text(self.value.to_owned()),
            CellType::SharedString => {
                let index = self.value.trim().parse::<usize>()?;
                let text = shared_strings
                    .get(index)
                    .ok_or_else(|| invalid(format!("shared string {} out of range", index)))?;
                Value::Text(text.to_owned())
            }
            CellType::Error => Err(invalid(format!("cell holds error value {}", self.value)))?,
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell {
            row: 1,
            col: 2,
            kind,
            value: value.to_owned(),
        }
    }

    #[test]
    fn parses_type_attribute() {
        assert_eq!(CellType::parse(None, true), CellType::Number);
        assert_eq!(CellType::parse(Some("s"), true), CellType::SharedString);
        assert_eq!(CellType::parse(Some("str"), true), CellType::InlineString);
        assert_eq!(CellType::parse(Some("e"), true), CellType::Empty);
        assert_eq!(CellType::parse(Some("e"), false), CellType::Error);
    }

    #[test]
    fn converts_to_values() {
        let shared = vec!["Apple".to_owned()];
        assert_eq!(cell(CellType::Number, "10.5").to_value("s", &shared).unwrap(), Value::Number(10.5));
        assert_eq!(cell(CellType::SharedString, "0").to_value("s", &shared).unwrap(), Value::from("Apple"));
        assert_eq!(cell(CellType::Boolean, "1").to_value("s", &shared).unwrap(), Value::Boolean(true));
        assert_eq!(
            cell(CellType::IsoDateTime, "2024-01-02T03:04:05").to_value("s", &shared).unwrap(),
            Value::from("2024-01-02 03:04:05")
        );
    }

    #[test]
    fn reports_position_of_bad_cells() {
        let error = cell(CellType::SharedString, "3").to_value("Catalog", &[]).unwrap_err();
        assert_eq!(error.to_string(), "Invalid value in sheet 'Catalog' at C2: shared string 3 out of range");

        let error = cell(CellType::Error, "#N/A").to_value("Catalog", &[]).unwrap_err();
        assert!(error.to_string().contains("#N/A"));
    }
}
