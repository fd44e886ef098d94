//! # Workbook Reading
//!
//! Reads an Office Open XML workbook (`.xlsx`, `.xlsm`) from memory into one
//! [`Table`] per worksheet. The container is opened with `zip` and every part
//! is streamed through `quick-xml`; nothing is written back.
pub(crate) mod cell;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

use crate::error::ResultMessage;
use crate::error::StoreCatalogError;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use crate::table::Table;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while reading the workbook structure or its cells.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// A part the workbook format requires is missing from the archive
    #[error("Missing workbook part '{0}'")]
    FileError(String),

    /// The workbook lists no worksheets
    #[error("Workbook contains no sheets")]
    SpreadsheetEmptyError,

    /// Sheet name, cell reference, message
    #[error("Invalid value in sheet '{0}' at {1}: {2}")]
    CellValueError(String, String, String),
}

/// Options controlling how cells are read.
#[derive(Copy, Clone, Debug)]
pub struct ReadOptions {
    /// Read error cells (`#N/A`, `#REF!`...) as empty instead of failing
    pub error_as_null: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions { error_as_null: true }
    }
}

/// All worksheets of a workbook, in workbook order.
#[derive(Clone, Debug, Default)]
pub struct Workbook {
    pub sheets: Vec<Table>,
}

impl Workbook {
    /// Parses workbook bytes. Any failure here is structural: the bytes are
    /// not a readable workbook.
    pub fn from_bytes(bytes: Vec<u8>, options: ReadOptions) -> Result<Workbook, StoreCatalogError> {
        let mut spreadsheet = XlsxSpreadsheet::open(bytes).with_prefix("Unreadable workbook")?;
        let sheets = spreadsheet
            .read_tables(options.error_as_null)
            .with_prefix("Unreadable workbook")?;
        info!(sheets = ?spreadsheet.sheet_names(), "loaded workbook");
        Ok(Workbook { sheets })
    }

    /// Reads a workbook from a local file.
    pub fn open<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Workbook, StoreCatalogError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(StoreCatalogError::from)
            .with_prefix(&format!("Cannot read '{}'", path.display()))?;
        Workbook::from_bytes(bytes, options)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;
    use std::io::Cursor;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const WORKBOOK: &str = r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Catalog" sheetId="1" r:id="rId2"/></sheets></workbook>"#;
    const RELATIONSHIPS: &str = r#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet1.xml"/></Relationships>"#;
    const SHARED_STRINGS: &str = r#"<sst><si><t>external_id</t></si><si><r><t>name_</t></r><r><t>english</t></r></si><si><t>Caf&#233;</t><rPh><t>kafe</t></rPh></si></sst>"#;
    const SHEET: &str = r#"<worksheet><sheetData>
        <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
        <row r="2"><c t="inlineStr"><is><t>P1</t></is></c><c t="s"><v>2</v></c></row>
        <row r="4"><c r="A4"><v>1001</v></c><c r="B4" t="b"><v>1</v></c></row>
    </sheetData></worksheet>"#;

    fn workbook(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn reads_shared_and_inline_strings() {
        let bytes = workbook(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELATIONSHIPS),
            ("xl/sharedStrings.xml", SHARED_STRINGS),
            ("xl/worksheets/sheet1.xml", SHEET),
        ]);

        let workbook = Workbook::from_bytes(bytes, ReadOptions::default()).unwrap();

        assert_eq!(workbook.sheet_names(), vec!["Catalog"]);
        let table = &workbook.sheets[0];
        assert_eq!(table.columns, vec!["external_id", "name_english"]);
        assert_eq!(table.records[0], vec![Value::from("P1"), Value::from("Café")]);
        assert_eq!(table.records[1], vec![Value::Number(1001.0), Value::Boolean(true)]);
    }

    #[test]
    fn workbook_without_sheets_is_rejected() {
        let bytes = workbook(&[
            ("xl/workbook.xml", "<workbook><sheets/></workbook>"),
            ("xl/_rels/workbook.xml.rels", "<Relationships/>"),
        ]);

        let error = Workbook::from_bytes(bytes, ReadOptions::default()).unwrap_err();

        assert_eq!(error.to_string(), "Unreadable workbook: Workbook contains no sheets");
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = Workbook::open("no/such/catalog.xlsx", ReadOptions::default()).unwrap_err();

        assert!(error.to_string().starts_with("Cannot read 'no/such/catalog.xlsx'"));
    }

    #[test]
    fn missing_workbook_part_is_rejected() {
        let bytes = workbook(&[("xl/_rels/workbook.xml.rels", RELATIONSHIPS)]);

        let error = Workbook::from_bytes(bytes, ReadOptions::default()).unwrap_err();

        assert_eq!(error.to_string(), "Unreadable workbook: Missing workbook part 'xl/workbook.xml'");
    }
}
