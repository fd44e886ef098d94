//! Positional sheet selection and identifier clean-up.

use crate::pipeline::PipelineError;
use crate::table::Table;
use crate::table::Value;
use tracing::debug;

/// Columns whose values identify products and stores.
pub const IDENTIFIER_COLUMNS: [&str; 3] = ["product_id", "store_id", "external_id"];

/// The four sheets the pipeline consumes, in workbook order.
#[derive(Clone, Debug)]
pub struct SourceSheets {
    /// Output-shape template; carried but never read
    pub template: Table,
    pub catalog: Table,
    pub updates: Table,
    pub images: Table,
}

impl SourceSheets {
    pub const REQUIRED_SHEETS: usize = 4;

    /// Picks the template, catalog, update feed and image sheets by position
    /// and returns normalized copies. Sheets after the fourth are ignored.
    pub fn from_sheets(sheets: &[Table]) -> Result<SourceSheets, PipelineError> {
        let [template, catalog, updates, images, ..] = sheets else {
            return Err(PipelineError::NotEnoughSheets {
                required: Self::REQUIRED_SHEETS,
                found: sheets.len(),
            });
        };
        debug!(
            catalog = %catalog.name,
            updates = %updates.name,
            images = %images.name,
            "selected source sheets"
        );
        Ok(SourceSheets {
            template: template.clone(),
            catalog: normalize_identifiers(catalog.clone()),
            updates: normalize_identifiers(updates.clone()),
            images: normalize_identifiers(images.clone()),
        })
    }
}

/// Rewrites every identifier column present in the table as trimmed text.
/// Blank cells become empty text.
pub fn normalize_identifiers(mut table: Table) -> Table {
    for column in IDENTIFIER_COLUMNS {
        table.map_column(column, normalize_identifier);
    }
    table
}

fn normalize_identifier(value: &Value) -> Value {
    Value::Text(value.to_text().trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str) -> Table {
        Table::new(name, Vec::new())
    }

    #[test]
    fn fewer_than_four_sheets_is_an_error() {
        let sheets = vec![sheet("Output"), sheet("Catalog"), sheet("MAJ")];

        let error = SourceSheets::from_sheets(&sheets).unwrap_err();

        assert!(matches!(error, PipelineError::NotEnoughSheets { required: 4, found: 3 }));
        assert_eq!(error.to_string(), "The workbook must contain at least 4 sheets, found 3");
    }

    #[test]
    fn sheets_are_taken_by_position() {
        let sheets = vec![sheet("A"), sheet("B"), sheet("C"), sheet("D"), sheet("E")];

        let sources = SourceSheets::from_sheets(&sheets).unwrap();

        assert_eq!(sources.template.name, "A");
        assert_eq!(sources.catalog.name, "B");
        assert_eq!(sources.updates.name, "C");
        assert_eq!(sources.images.name, "D");
    }

    #[test]
    fn identifiers_become_trimmed_text() {
        let mut updates = Table::new(
            "MAJ",
            vec!["product_id".to_owned(), "store_id".to_owned(), "price".to_owned()],
        );
        updates.push(vec![Value::Number(1001.0), Value::from("  S1 "), Value::Number(10.0)]);
        updates.push(vec![Value::Null, Value::from("S2"), Value::from(" 12 ")]);
        let original = updates.clone();

        let normalized = normalize_identifiers(updates);

        assert_eq!(normalized.records[0], vec![Value::from("1001"), Value::from("S1"), Value::Number(10.0)]);
        assert_eq!(normalized.records[1], vec![Value::from(""), Value::from("S2"), Value::from(" 12 ")]);
        assert_eq!(original.records[0][0], Value::Number(1001.0));
    }
}
