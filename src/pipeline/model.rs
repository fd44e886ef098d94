//! Typed rows of the three logic sheets and of the merged result.

use crate::pipeline::PipelineError;
use crate::table::Table;
use crate::table::Value;

/// One line of the update feed: this store stocks this product at this price.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateRow {
    pub product_id: String,
    pub store_id: String,
    pub price: Value,
    pub quantity: Value,
}

/// Descriptive metadata for one product.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub external_id: String,
    pub name_english: Value,
    pub category: Value,
    pub sub_category: Value,
    pub description: Value,
}

/// One image link; several may exist per product.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageEntry {
    pub external_id: String,
    pub image: Value,
    /// Smaller is preferred; `None` when absent or not numeric
    pub picture_order: Option<f64>,
}

/// An update row with its catalog and image data attached. Fields that
/// found no match are null.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedRow {
    pub product_id: String,
    pub store_id: String,
    pub price: Value,
    pub quantity: Value,
    pub name_english: Value,
    pub category: Value,
    pub sub_category: Value,
    pub description: Value,
    pub image: Value,
    /// Zero-based occurrence of this name within its store, set by the
    /// name disambiguator
    pub name_occurrence: usize,
}

fn required_column(table: &Table, name: &str) -> Result<usize, PipelineError> {
    table.column_index(name).ok_or_else(|| PipelineError::MissingColumn {
        sheet: table.name.to_owned(),
        column: name.to_owned(),
    })
}

fn value_at(table: &Table, record: usize, column: Option<usize>) -> Value {
    column.map(|column| table.get(record, column).clone()).unwrap_or_default()
}

fn identifier_at(table: &Table, record: usize, column: usize) -> String {
    table.get(record, column).to_text()
}

impl UpdateRow {
    pub fn from_table(table: &Table) -> Result<Vec<UpdateRow>, PipelineError> {
        let product_id = required_column(table, "product_id")?;
        let store_id = required_column(table, "store_id")?;
        let price = table.column_index("price");
        let quantity = table.column_index("quantity");
        Ok((0..table.len())
            .map(|record| UpdateRow {
                product_id: identifier_at(table, record, product_id),
                store_id: identifier_at(table, record, store_id),
                price: value_at(table, record, price),
                quantity: value_at(table, record, quantity),
            })
            .collect())
    }
}

impl CatalogEntry {
    pub fn from_table(table: &Table) -> Result<Vec<CatalogEntry>, PipelineError> {
        let external_id = required_column(table, "external_id")?;
        let name_english = required_column(table, "name_english")?;
        let category = table.column_index("category");
        let sub_category = table.column_index("sub_category");
        let description = table.column_index("description");
        Ok((0..table.len())
            .map(|record| CatalogEntry {
                external_id: identifier_at(table, record, external_id),
                name_english: table.get(record, name_english).clone(),
                category: value_at(table, record, category),
                sub_category: value_at(table, record, sub_category),
                description: value_at(table, record, description),
            })
            .collect())
    }
}

impl ImageEntry {
    pub fn from_table(table: &Table) -> Result<Vec<ImageEntry>, PipelineError> {
        let external_id = required_column(table, "external_id")?;
        let image = required_column(table, "image")?;
        let picture_order = table.column_index("PICTURE_ORDER");
        Ok((0..table.len())
            .map(|record| ImageEntry {
                external_id: identifier_at(table, record, external_id),
                image: table.get(record, image).clone(),
                picture_order: value_at(table, record, picture_order).as_number(),
            })
            .collect())
    }
}
