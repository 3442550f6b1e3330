use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::crm::leads::domain::{
    BudgetRange, Lead, LeadDraft, LeadId, LeadOrigin, Listing, ListingId, ListingStatus,
    MoveInWindow,
};
use crate::crm::leads::matching::{MatchConfig, MatchEngine};
use crate::crm::leads::repository::{
    CatalogError, LeadRecord, LeadRepository, ListingCatalog, RepositoryError,
};
use crate::crm::leads::service::LeadMatchService;

pub(super) fn evaluation_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn verification_expiry() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn move_in_window() -> MoveInWindow {
    MoveInWindow {
        start: NaiveDate::from_ymd_opt(2026, 10, 1).expect("valid start"),
        end: NaiveDate::from_ymd_opt(2026, 10, 31).expect("valid end"),
    }
}

pub(super) fn neighborhoods(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub(super) fn draft() -> LeadDraft {
    LeadDraft {
        budget: BudgetRange {
            min: 2500,
            max: 3200,
        },
        preferred_neighborhoods: neighborhoods(&["Park Slope"]),
        min_bedrooms: 2,
        move_in: move_in_window(),
        verification_expires_at: verification_expiry(),
        origin: LeadOrigin::DeniedApplicant,
    }
}

pub(super) fn lead(suffix: &str) -> Lead {
    Lead {
        lead_id: LeadId(format!("lead-{suffix}")),
        budget: BudgetRange {
            min: 2500,
            max: 3200,
        },
        preferred_neighborhoods: neighborhoods(&["Park Slope"]),
        min_bedrooms: 2,
        move_in: move_in_window(),
        verification_expires_at: verification_expiry(),
        origin: LeadOrigin::DeniedApplicant,
    }
}

pub(super) fn listing(
    id: &str,
    neighborhood: &str,
    rent: u32,
    bedrooms: u8,
    available: (i32, u32, u32),
    status: ListingStatus,
) -> Listing {
    Listing {
        listing_id: ListingId(id.to_string()),
        neighborhood: neighborhood.to_string(),
        monthly_rent: rent,
        bedrooms,
        available_on: NaiveDate::from_ymd_opt(available.0, available.1, available.2)
            .expect("valid availability date"),
        status,
    }
}

pub(super) fn park_slope_unit() -> Listing {
    listing(
        "unit-301",
        "Park Slope",
        2600,
        2,
        (2026, 10, 5),
        ListingStatus::Active,
    )
}

pub(super) fn bushwick_unit() -> Listing {
    listing(
        "unit-302",
        "Bushwick",
        3100,
        2,
        (2026, 10, 12),
        ListingStatus::Active,
    )
}

pub(super) fn engine() -> MatchEngine {
    MatchEngine::new(MatchConfig::default().validated().expect("default config"))
}

pub(super) fn engine_without_floor() -> MatchEngine {
    let config = MatchConfig {
        relevance_floor: 0.0,
        ..MatchConfig::default()
    };
    MatchEngine::new(config.validated().expect("floorless config"))
}

pub(super) fn build_service() -> (
    LeadMatchService<MemoryLeadRepository, MemoryCatalog>,
    Arc<MemoryLeadRepository>,
    Arc<MemoryCatalog>,
) {
    let leads = Arc::new(MemoryLeadRepository::default());
    let catalog = Arc::new(MemoryCatalog::default());
    let service = LeadMatchService::new(leads.clone(), catalog.clone(), MatchConfig::default())
        .expect("default config validates");
    (service, leads, catalog)
}

#[derive(Default, Clone)]
pub(super) struct MemoryLeadRepository {
    pub(super) records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
}

impl LeadRepository for MemoryLeadRepository {
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
        guard.insert(record.lead.lead_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status == crate::crm::leads::domain::LeadStatus::Active)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCatalog {
    pub(super) listings: Arc<Mutex<HashMap<ListingId, Listing>>>,
}

impl ListingCatalog for MemoryCatalog {
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

pub(super) struct UnavailableLeadRepository;

impl LeadRepository for UnavailableLeadRepository {
    fn insert(&self, _record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: LeadRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn active(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
