//! # Store Catalog
//!
//! Splits a retail catalog workbook into one CSV file per store.
//!
//! The workbook carries four sheets, taken by position: an output template,
//! the product catalog, the stock and price update feed, and the image links.
//! Every update row is joined with its catalog entry and best image, duplicate
//! and incomplete rows are dropped, colliding names within a store are made
//! distinct, and the rows of each store are written to `Output_Store_<id>.csv`
//! inside one ZIP archive.
//!
//! ## Features
//!
//! - **Pure Rust workbook reader**: `.xlsx`/`.xlsm` parsed from memory with
//!   `zip` and `quick-xml`
//! - **Deterministic output**: identical input yields byte-identical archives
//! - **Configurable name collisions**: none, trailing spaces, or accent flips
//! - **Diagnostics**: row counts after every stage and the list of renamed rows
//! - **Upload cache**: parsed workbooks are reused while the bytes are unchanged
//!
//! ```no_run
//! use store_catalog::{PipelineConfig, Session};
//!
//! let bytes = std::fs::read("catalog.xlsx")?;
//! let mut session = Session::new(PipelineConfig::default(), None);
//! let outcome = session.process(&bytes)?;
//! if let Some(archive) = outcome.archive {
//!     std::fs::write("stores.zip", archive.bytes)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod cache;
pub mod error;
mod helpers;
pub mod pipeline;
pub mod spreadsheet;
pub mod table;

pub use cache::Session;
pub use cache::WorkbookCache;
pub use error::StoreCatalogError;
pub use pipeline::Diagnostics;
pub use pipeline::NameCollisionPolicy;
pub use pipeline::Outcome;
pub use pipeline::Pipeline;
pub use pipeline::PipelineConfig;
pub use pipeline::PipelineError;
pub use spreadsheet::ReadOptions;
pub use spreadsheet::Workbook;
