use thiserror::Error;

/// Main error type for the store catalog pipeline.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum StoreCatalogError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    CsvError(#[from] csv::Error),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Pipeline module errors
    #[error("{0}")]
    PipelineError(#[from] crate::pipeline::PipelineError),
}

impl StoreCatalogError {
    /// Returns true when the error concerns a column the pipeline needs but the
    /// workbook does not provide.
    pub fn is_missing_column(&self) -> bool {
        matches!(
            self,
            Self::PipelineError(crate::pipeline::PipelineError::MissingColumn { .. })
        )
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, StoreCatalogError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| StoreCatalogError::WithContextError(format!("{}: {}", message, e)))
    }
}
