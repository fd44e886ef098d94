//! Parsed-workbook cache keyed by the content fingerprint of the upload.

use crate::error::StoreCatalogError;
use crate::pipeline::Outcome;
use crate::pipeline::Pipeline;
use crate::pipeline::PipelineConfig;
use crate::spreadsheet::Workbook;
use sha2::Digest;
use sha2::Sha256;
use std::fmt::Write;
use std::time::Duration;
use std::time::Instant;
use tracing::debug;

/// Lowercase hex SHA-256 of the bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(&mut out, "{:02x}", byte);
    }
    out
}

struct CachedWorkbook {
    fingerprint: String,
    loaded_at: Instant,
    workbook: Workbook,
}

/// Holds the most recently parsed workbook. Uploading different bytes
/// replaces it; an entry older than the time-to-live is parsed again.
pub struct WorkbookCache {
    ttl: Option<Duration>,
    entry: Option<CachedWorkbook>,
}

impl WorkbookCache {
    /// `None` keeps the entry until it is replaced or invalidated.
    pub fn new(ttl: Option<Duration>) -> Self {
        WorkbookCache { ttl, entry: None }
    }

    /// Fingerprint of the cached workbook, if any.
    pub fn fingerprint(&self) -> Option<&str> {
        self.entry.as_ref().map(|entry| entry.fingerprint.as_str())
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    fn is_fresh(&self, entry: &CachedWorkbook) -> bool {
        self.ttl.map(|ttl| entry.loaded_at.elapsed() < ttl).unwrap_or(true)
    }

    /// Returns the cached workbook for these bytes, calling `load` when the
    /// bytes differ from the cached ones or the entry has expired.
    pub fn get_or_load<F>(&mut self, bytes: &[u8], load: F) -> Result<&Workbook, StoreCatalogError>
    where
        F: FnOnce(Vec<u8>) -> Result<Workbook, StoreCatalogError>,
    {
        let fingerprint = fingerprint(bytes);
        let entry = match self.entry.take() {
            Some(entry) if entry.fingerprint == fingerprint && self.is_fresh(&entry) => {
                debug!(fingerprint = %fingerprint, "workbook cache hit");
                entry
            }
            _ => {
                debug!(fingerprint = %fingerprint, "workbook cache miss");
                CachedWorkbook {
                    workbook: load(bytes.to_vec())?,
                    fingerprint,
                    loaded_at: Instant::now(),
                }
            }
        };
        Ok(&self.entry.insert(entry).workbook)
    }
}

/// A cache plus the settings to run the pipeline with.
pub struct Session {
    cache: WorkbookCache,
    pipeline: Pipeline,
}

impl Session {
    pub fn new(config: PipelineConfig, ttl: Option<Duration>) -> Self {
        Session {
            cache: WorkbookCache::new(ttl),
            pipeline: Pipeline::new(config),
        }
    }

    pub fn cache(&self) -> &WorkbookCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut WorkbookCache {
        &mut self.cache
    }

    /// Parses the workbook, or reuses the cached one, and runs the pipeline.
    pub fn process(&mut self, bytes: &[u8]) -> Result<Outcome, StoreCatalogError> {
        let options = self.pipeline.config().read_options();
        let workbook = self
            .cache
            .get_or_load(bytes, |bytes| Workbook::from_bytes(bytes, options))?;
        self.pipeline.run(workbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    fn workbook(name: &str) -> Workbook {
        Workbook {
            sheets: vec![Table::new(name, Vec::new())],
        }
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        assert_eq!(
            fingerprint(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn same_bytes_reuse_the_parsed_workbook() {
        let mut cache = WorkbookCache::new(None);
        let mut loads = 0;

        for _ in 0..3 {
            cache
                .get_or_load(b"upload", |_| {
                    loads += 1;
                    Ok(workbook("first"))
                })
                .unwrap();
        }

        assert_eq!(loads, 1);
        assert_eq!(cache.fingerprint(), Some(fingerprint(b"upload").as_str()));
    }

    #[test]
    fn new_upload_replaces_the_entry() {
        let mut cache = WorkbookCache::new(None);
        cache.get_or_load(b"one", |_| Ok(workbook("one"))).unwrap();

        let loaded = cache.get_or_load(b"two", |_| Ok(workbook("two"))).unwrap();

        assert_eq!(loaded.sheet_names(), vec!["two"]);
        assert_eq!(cache.fingerprint(), Some(fingerprint(b"two").as_str()));
    }

    #[test]
    fn expired_entry_is_loaded_again() {
        let mut cache = WorkbookCache::new(Some(Duration::ZERO));
        let mut loads = 0;

        for _ in 0..2 {
            cache
                .get_or_load(b"upload", |_| {
                    loads += 1;
                    Ok(workbook("sheet"))
                })
                .unwrap();
        }

        assert_eq!(loads, 2);
    }

    #[test]
    fn invalidate_clears_the_entry() {
        let mut cache = WorkbookCache::new(None);
        cache.get_or_load(b"upload", |_| Ok(workbook("sheet"))).unwrap();

        cache.invalidate();

        assert_eq!(cache.fingerprint(), None);
    }

    #[test]
    fn failed_load_leaves_the_cache_empty() {
        let mut cache = WorkbookCache::new(None);
        cache.get_or_load(b"one", |_| Ok(workbook("one"))).unwrap();

        let result = cache.get_or_load(b"broken", |_| {
            Err(StoreCatalogError::WithContextError("Unreadable workbook".to_owned()))
        });

        assert!(result.is_err());
        assert_eq!(cache.fingerprint(), None);
    }

    #[test]
    fn session_reports_unreadable_bytes() {
        let mut session = Session::new(PipelineConfig::default(), None);

        let error = session.process(b"not a zip").unwrap_err();

        assert!(error.to_string().starts_with("Unreadable workbook"));
    }
}
