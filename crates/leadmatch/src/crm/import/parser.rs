use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;

use super::ListingImportError;
use crate::crm::leads::domain::{Listing, ListingId, ListingStatus};

pub(crate) fn parse_listings<R: Read>(reader: R) -> Result<Vec<Listing>, ListingImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut listings = Vec::new();

    for (index, record) in csv_reader.deserialize::<ListingRow>().enumerate() {
        let row = record?;
        // Header occupies line 1.
        let line = index as u64 + 2;
        listings.push(row.into_listing(line)?);
    }

    Ok(listings)
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(rename = "Listing ID")]
    listing_id: String,
    #[serde(rename = "Neighborhood")]
    neighborhood: String,
    #[serde(rename = "Monthly Rent")]
    monthly_rent: u32,
    #[serde(rename = "Bedrooms")]
    bedrooms: u8,
    #[serde(rename = "Available On")]
    available_on: String,
    #[serde(rename = "Status")]
    status: String,
}

impl ListingRow {
    fn into_listing(self, line: u64) -> Result<Listing, ListingImportError> {
        let available_on = NaiveDate::parse_from_str(self.available_on.trim(), "%Y-%m-%d")
            .map_err(|err| ListingImportError::Row {
                line,
                detail: format!("'{}' is not a YYYY-MM-DD date: {err}", self.available_on),
            })?;

        let status = ListingStatus::parse_label(&self.status).ok_or_else(|| {
            ListingImportError::Row {
                line,
                detail: format!("unknown listing status '{}'", self.status),
            }
        })?;

        if self.listing_id.trim().is_empty() {
            return Err(ListingImportError::Row {
                line,
                detail: "listing id must not be blank".to_string(),
            });
        }

        Ok(Listing {
            listing_id: ListingId(self.listing_id),
            neighborhood: self.neighborhood,
            monthly_rent: self.monthly_rent,
            bedrooms: self.bedrooms,
            available_on,
            status,
        })
    }
}
