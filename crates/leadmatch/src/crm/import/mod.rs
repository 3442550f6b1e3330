//! Bulk listing-catalog import from CSV exports.
//!
//! Expected headers: `Listing ID, Neighborhood, Monthly Rent, Bedrooms,
//! Available On, Status`, with dates formatted `YYYY-MM-DD` and statuses
//! matching the catalog labels (`active`, `pending`, `rented`, `expired`).

mod parser;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::crm::leads::domain::Listing;

#[derive(Debug)]
pub enum ListingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, detail: String },
}

impl std::fmt::Display for ListingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            ListingImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            ListingImportError::Row { line, detail } => {
                write!(f, "invalid catalog row at line {}: {}", line, detail)
            }
        }
    }
}

impl std::error::Error for ListingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingImportError::Io(err) => Some(err),
            ListingImportError::Csv(err) => Some(err),
            ListingImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for ListingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ListingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads listing catalogs exported from the marketplace back office.
pub struct ListingCsvImporter;

impl ListingCsvImporter {
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Listing>, ListingImportError> {
        parser::parse_listings(reader)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Listing>, ListingImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}
