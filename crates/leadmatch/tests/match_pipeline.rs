use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use leadmatch::crm::leads::{
    BudgetRange, CatalogError, LeadDraft, LeadId, LeadMatchService, LeadOrigin, LeadRecord,
    LeadRepository, LeadStatus, Listing, ListingCatalog, ListingId, ListingStatus, MatchConfig,
    MoveInWindow, RepositoryError,
};

#[derive(Default)]
struct MapLeadRepository {
    records: Mutex<HashMap<LeadId, LeadRecord>>,
}

impl LeadRepository for MapLeadRepository {
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
            .filter(|record| record.status == LeadStatus::Active)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct MapCatalog {
    listings: Mutex<HashMap<ListingId, Listing>>,
}

impl ListingCatalog for MapCatalog {
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

fn evaluation_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0)
        .single()
        .expect("valid instant")
}

fn outreach_draft(expires_at: DateTime<Utc>) -> LeadDraft {
    let mut preferred = BTreeSet::new();
    preferred.insert("Park Slope".to_string());

    LeadDraft {
        budget: BudgetRange {
            min: 2500,
            max: 3200,
        },
        preferred_neighborhoods: preferred,
        min_bedrooms: 2,
        move_in: MoveInWindow {
            start: NaiveDate::from_ymd_opt(2026, 10, 1).expect("valid start"),
            end: NaiveDate::from_ymd_opt(2026, 10, 31).expect("valid end"),
        },
        verification_expires_at: expires_at,
        origin: LeadOrigin::DeniedApplicant,
    }
}

fn unit(id: &str, neighborhood: &str, rent: u32, day: u32) -> Listing {
    Listing {
        listing_id: ListingId(id.to_string()),
        neighborhood: neighborhood.to_string(),
        monthly_rent: rent,
        bedrooms: 2,
        available_on: NaiveDate::from_ymd_opt(2026, 10, day).expect("valid date"),
        status: ListingStatus::Active,
    }
}

#[test]
fn denied_applicant_flows_from_intake_to_ranked_outreach() {
    let service = LeadMatchService::new(
        Arc::new(MapLeadRepository::default()),
        Arc::new(MapCatalog::default()),
        MatchConfig::default(),
    )
    .expect("default config validates");

    let expires_at = evaluation_instant() + Duration::days(60);
    let record = service
        .register(outreach_draft(expires_at))
        .expect("denied applicant becomes a lead");

    service
        .add_listing(unit("unit-ps-a", "Park Slope", 2600, 5))
        .expect("listing admitted");
    service
        .add_listing(unit("unit-ps-b", "Park Slope", 2550, 12))
        .expect("listing admitted");
    service
        .add_listing(unit("unit-bw", "Bushwick", 3100, 12))
        .expect("listing admitted");

    let outcome = service
        .matches_for(&record.lead.lead_id, evaluation_instant())
        .expect("engine runs");

    let matches = outcome.ranked();
    assert_eq!(matches.len(), 2, "only in-set units clear the floor");
    assert_eq!(matches[0].listing_id.0, "unit-ps-b", "cheaper unit wins the tie");
    assert!(matches.iter().all(|result| result.score >= 60.0));

    let touched = service
        .record_contact(&record.lead.lead_id, evaluation_instant())
        .expect("outreach recorded");
    assert_eq!(touched.contact_count, 1);

    let archived = service
        .archive_expired(expires_at + Duration::days(1))
        .expect("sweep runs");
    assert_eq!(archived, vec![record.lead.lead_id.clone()]);

    let outcome = service
        .matches_for(&record.lead.lead_id, expires_at + Duration::days(1))
        .expect("engine still runs");
    assert!(!outcome.is_eligible(), "lapsed lead is explicitly ineligible");
}
