//! Lookup of workbook parts inside the OOXML ZIP container

use crate::error::StoreCatalogError;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

/// Part access on a workbook archive
pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Gets a part by name. Matching ignores ASCII case and treats `\` as `/`,
    /// since some writers emit Windows separators in relationship targets.
    fn part(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, StoreCatalogError>;

    /// Opens an XML reader over a part, or `None` when the part is absent
    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, StoreCatalogError>;
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    fn part(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, StoreCatalogError> {
        let pattern = name.replace('\\', "/");
        let stored_name = self
            .file_names()
            .find(|file_name| pattern.eq_ignore_ascii_case(&file_name.replace('\\', "/")))
            .map(str::to_owned);
        let Some(stored_name) = stored_name else {
            return Ok(None);
        };
        match self.by_name(&stored_name) {
            Ok(file) => Ok(Some(file)),
            Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }

    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, StoreCatalogError> {
        Ok(self.part(name)?.map(|file| XmlReader::new(BufReader::new(file))))
    }
}
