//! # Catalog Pipeline
//!
//! Turns the sheets of a retail catalog workbook into one CSV file per store:
//!
//! 1. the template, catalog, update feed and image sheets are taken by
//!    position and their identifier columns normalized ([`normalize`]);
//! 2. one image is chosen per product ([`images`]);
//! 3. every update row is left-joined with its catalog entry and image
//!    ([`reconcile`]);
//! 4. duplicate (store, product) rows and rows missing a name or an image
//!    are dropped ([`validate`]);
//! 5. names colliding within a store are rewritten ([`disambiguate`]);
//! 6. rows are grouped by store and packed into a ZIP archive ([`export`]).
pub mod disambiguate;
pub mod export;
pub mod images;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod validate;

pub use disambiguate::NameCollisionPolicy;
pub use disambiguate::RenamedRow;
pub use export::Archive;
pub use export::ArchiveEntry;
pub use model::MergedRow;

use crate::error::StoreCatalogError;
use crate::pipeline::model::CatalogEntry;
use crate::pipeline::model::ImageEntry;
use crate::pipeline::model::UpdateRow;
use crate::pipeline::normalize::SourceSheets;
use crate::spreadsheet::ReadOptions;
use crate::spreadsheet::Workbook;
use crate::table::Table;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing::warn;

/// Errors raised by the pipeline when the workbook content does not fit
/// the expected layout.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("The workbook must contain at least {required} sheets, found {found}")]
    NotEnoughSheets { required: usize, found: usize },

    #[error("Sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Invalid value '{value}' in column '{column}'")]
    InvalidValue { column: String, value: String },

    #[error("Unknown name collision policy '{0}', expected one of: none, space-pad, accent")]
    UnknownPolicy(String),
}

/// Columns the export needs from the update feed.
const EXPORTED_UPDATE_COLUMNS: [&str; 2] = ["price", "quantity"];
/// Columns the export needs from the catalog.
const EXPORTED_CATALOG_COLUMNS: [&str; 2] = ["category", "sub_category"];

/// Pipeline settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub policy: NameCollisionPolicy,
    /// Read error cells as empty instead of failing
    pub error_as_null: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            policy: NameCollisionPolicy::default(),
            error_as_null: ReadOptions::default().error_as_null,
        }
    }
}

impl PipelineConfig {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            error_as_null: self.error_as_null,
        }
    }
}

/// Row counts after each stage, plus the rows whose name was rewritten.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Rows of the update feed
    pub total_rows: usize,
    pub rows_after_dedup: usize,
    pub duplicates_removed: usize,
    pub rejected_incomplete: usize,
    pub rows_final: usize,
    pub renamed: Vec<RenamedRow>,
}

/// Result of one run. `archive` is `None` when no row survived validation.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub diagnostics: Diagnostics,
    pub archive: Option<Archive>,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.archive.is_none()
    }
}

/// Runs the catalog pipeline over parsed workbooks.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parses workbook bytes and runs the pipeline over them.
    pub fn run_bytes(&self, bytes: Vec<u8>) -> Result<Outcome, StoreCatalogError> {
        let workbook = Workbook::from_bytes(bytes, self.config.read_options())?;
        self.run(&workbook)
    }

    pub fn run(&self, workbook: &Workbook) -> Result<Outcome, StoreCatalogError> {
        let sources = SourceSheets::from_sheets(&workbook.sheets)?;
        let updates = UpdateRow::from_table(&sources.updates)?;
        let catalog = CatalogEntry::from_table(&sources.catalog)?;
        let images = images::resolve_images(ImageEntry::from_table(&sources.images)?);

        let merged = reconcile::reconcile(&updates, &catalog, &images);
        let total_rows = merged.len();
        let (deduplicated, duplicates_removed) = validate::remove_duplicates(merged);
        let rows_after_dedup = deduplicated.len();
        let (mut rows, rejected_incomplete) = validate::drop_incomplete(deduplicated);
        let renamed = disambiguate::disambiguate(&mut rows, self.config.policy);

        let diagnostics = Diagnostics {
            total_rows,
            rows_after_dedup,
            duplicates_removed,
            rejected_incomplete,
            rows_final: rows.len(),
            renamed,
        };
        info!(
            total_rows,
            rows_after_dedup,
            duplicates_removed,
            rejected_incomplete,
            rows_final = diagnostics.rows_final,
            renamed = diagnostics.renamed.len(),
            policy = %self.config.policy,
            "reconciled catalog"
        );

        if rows.is_empty() {
            warn!("no valid rows left after validation, nothing to export");
            return Ok(Outcome {
                diagnostics,
                archive: None,
            });
        }

        require_columns(&sources.updates, &EXPORTED_UPDATE_COLUMNS)?;
        require_columns(&sources.catalog, &EXPORTED_CATALOG_COLUMNS)?;
        let archive = export::export(&rows)?;
        if let Some(archive) = &archive {
            info!(stores = archive.entries.len(), bytes = archive.bytes.len(), "exported archive");
        }
        Ok(Outcome { diagnostics, archive })
    }
}

fn require_columns(table: &Table, columns: &[&str]) -> Result<(), PipelineError> {
    match columns.iter().find(|column| !table.has_column(column)) {
        Some(column) => Err(PipelineError::MissingColumn {
            sheet: table.name.to_owned(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}
