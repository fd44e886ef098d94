//! Per-store CSV files packaged into one ZIP archive.

use crate::error::StoreCatalogError;
use crate::pipeline::model::MergedRow;
use crate::pipeline::PipelineError;
use crate::table::Value;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Cursor;
use std::io::Write;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::DateTime;
use zip::ZipWriter;

/// Column order of every exported file.
pub const EXPORT_COLUMNS: [&str; 8] = [
    "name_english",
    "price",
    "quantity",
    "description",
    "category",
    "sub_category",
    "image",
    "external_id",
];

/// One line of a store file. Field order is the header order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputRow {
    pub name_english: String,
    pub price: String,
    pub quantity: i64,
    pub description: String,
    pub category: String,
    pub sub_category: String,
    pub image: String,
    pub external_id: String,
}

impl OutputRow {
    /// Projects a merged row onto the export schema, defaulting price and
    /// quantity to 0 and the descriptive fields to empty text.
    pub fn from_merged(row: &MergedRow) -> Result<OutputRow, PipelineError> {
        Ok(OutputRow {
            name_english: row.name_english.to_text(),
            price: row.price.clone().or(Value::Number(0.0)).to_text(),
            quantity: to_quantity(&row.quantity)?,
            description: row.description.to_text(),
            category: row.category.to_text(),
            sub_category: row.sub_category.to_text(),
            image: row.image.to_text(),
            external_id: row.product_id.to_owned(),
        })
    }
}

/// Integer stock quantity; fractional numbers truncate toward zero.
fn to_quantity(value: &Value) -> Result<i64, PipelineError> {
    let invalid = || PipelineError::InvalidValue {
        column: "quantity".to_owned(),
        value: value.to_text(),
    };
    match value {
        Value::Null => Ok(0),
        Value::Text(text) if text.trim().is_empty() => Ok(0),
        Value::Text(text) => match text.trim().parse::<i64>() {
            Ok(quantity) => Ok(quantity),
            Err(_) => value.as_number().map(|number| number.trunc() as i64).ok_or_else(invalid),
        },
        Value::Number(number) if number.is_finite() => Ok(number.trunc() as i64),
        _ => Err(invalid()),
    }
}

/// One file of the archive.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchiveEntry {
    pub store_id: String,
    pub file_name: String,
    pub rows: usize,
    /// UTF-8 CSV content, header included
    pub content: Vec<u8>,
}

/// The packaged output: one entry per store, in first-seen store order.
#[derive(Clone, Debug, PartialEq)]
pub struct Archive {
    pub entries: Vec<ArchiveEntry>,
    /// ZIP bytes
    pub bytes: Vec<u8>,
}

/// Archive entry name for a store. Path separators, `..` and control
/// characters are replaced with `_` so the entry stays at the archive root.
pub fn store_file_name(store_id: &str) -> String {
    let safe: String = store_id
        .chars()
        .map(|character| match character {
            '/' | '\\' => '_',
            character if character.is_control() => '_',
            character => character,
        })
        .collect();
    format!("Output_Store_{}.csv", safe.replace("..", "_"))
}

/// Groups rows by store, keeping stores in the order they first appear and
/// rows in input order within each store.
pub fn partition(rows: &[MergedRow]) -> IndexMap<&str, Vec<&MergedRow>> {
    let mut stores = IndexMap::<&str, Vec<&MergedRow>>::new();
    for row in rows {
        stores.entry(row.store_id.as_str()).or_default().push(row);
    }
    stores
}

/// Serializes rows as CSV with a header line.
pub fn write_csv(rows: &[OutputRow]) -> Result<Vec<u8>, StoreCatalogError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);
    // written by hand so that a store with no rows still gets its header
    writer.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|error| error.into_error().into())
}

/// Builds the per-store files and packs them into a ZIP archive. Returns
/// `None` when there are no rows, so that no empty archive is produced.
pub fn export(rows: &[MergedRow]) -> Result<Option<Archive>, StoreCatalogError> {
    if rows.is_empty() {
        return Ok(None);
    }

    let mut entries = Vec::new();
    let mut file_names = HashSet::<String>::new();
    for (store_id, store_rows) in partition(rows) {
        let output = store_rows
            .into_iter()
            .map(OutputRow::from_merged)
            .collect::<Result<Vec<_>, _>>()?;
        let content = write_csv(&output)?;
        debug!(store = store_id, rows = output.len(), "exported store");
        // distinct ids may share a sanitized name
        let mut file_name = store_file_name(store_id);
        let mut suffix = 1;
        while !file_names.insert(file_name.to_owned()) {
            suffix += 1;
            file_name = store_file_name(&format!("{}_{}", store_id, suffix));
        }
        entries.push(ArchiveEntry {
            store_id: store_id.to_owned(),
            file_name,
            rows: output.len(),
            content,
        });
    }

    let bytes = write_zip(&entries)?;
    Ok(Some(Archive { entries, bytes }))
}

/// Packs entries with a fixed timestamp so identical input gives identical bytes.
fn write_zip(entries: &[ArchiveEntry]) -> Result<Vec<u8>, StoreCatalogError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        writer.start_file(entry.file_name.as_str(), options)?;
        writer.write_all(&entry.content)?;
    }
    Ok(writer.finish()?.into_inner())
}
