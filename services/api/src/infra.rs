use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use leadmatch::crm::leads::{
    CatalogError, LeadId, LeadRecord, LeadRepository, LeadStatus, Listing, ListingCatalog,
    ListingId, MatchConfig, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
}

impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.lead.lead_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.lead.lead_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.lead.lead_id) {
            guard.insert(record.lead.lead_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status == LeadStatus::Active)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryListingCatalog {
    listings: Arc<Mutex<HashMap<ListingId, Listing>>>,
}

impl ListingCatalog for InMemoryListingCatalog {
    fn insert(&self, listing: Listing) -> Result<(), CatalogError> {
        let mut guard = self.listings.lock().expect("catalog mutex poisoned");
        if guard.contains_key(&listing.listing_id) {
            return Err(CatalogError::Conflict);
        }
        guard.insert(listing.listing_id.clone(), listing);
        Ok(())
    }

    fn replace(&self, listing: Listing) -> Result<(), CatalogError> {
        let mut guard = self.listings.lock().expect("catalog mutex poisoned");
        if guard.contains_key(&listing.listing_id) {
            guard.insert(listing.listing_id.clone(), listing);
            Ok(())
        } else {
            Err(CatalogError::NotFound)
        }
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, CatalogError> {
        let guard = self.listings.lock().expect("catalog mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<Listing>, CatalogError> {
        let guard = self.listings.lock().expect("catalog mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(crate) fn default_match_config() -> MatchConfig {
    MatchConfig::default()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
