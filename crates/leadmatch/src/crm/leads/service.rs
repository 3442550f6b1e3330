use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{LeadDraft, LeadId, LeadStatus, Listing, ListingId, ListingStatus};
use super::intake::{LeadIntakeGuard, LeadValidationError, ListingValidationError};
use super::matching::{MatchConfig, MatchConfigError, MatchEngine, MatchOutcome};
use super::repository::{CatalogError, LeadRecord, LeadRepository, ListingCatalog, RepositoryError};

/// Service composing the intake guard, repositories, and match rubric.
pub struct LeadMatchService<L, C> {
    guard: LeadIntakeGuard,
    leads: Arc<L>,
    catalog: Arc<C>,
    engine: MatchEngine,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

impl<L, C> LeadMatchService<L, C>
where
    L: LeadRepository + 'static,
    C: ListingCatalog + 'static,
{
    pub fn new(leads: Arc<L>, catalog: Arc<C>, config: MatchConfig) -> Result<Self, MatchConfigError> {
        let engine = MatchEngine::new(config.validated()?);

        Ok(Self {
            guard: LeadIntakeGuard,
            leads,
            catalog,
            engine,
        })
    }

    /// Admit a new lead into the outreach pool, returning the stored record.
    pub fn register(&self, draft: LeadDraft) -> Result<LeadRecord, LeadServiceError> {
        let mut lead = self.guard.lead_from_draft(draft)?;
        lead.lead_id = next_lead_id();

        let record = LeadRecord {
            lead,
            status: LeadStatus::Active,
            contact_count: 0,
            last_contacted_at: None,
        };

        let stored = self.leads.insert(record)?;
        Ok(stored)
    }

    /// Fetch a lead record for API responses.
    pub fn get(&self, lead_id: &LeadId) -> Result<LeadRecord, LeadServiceError> {
        let record = self
            .leads
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Record an outreach touch: bump the contact count and stamp the time.
    pub fn record_contact(
        &self,
        lead_id: &LeadId,
        at: DateTime<Utc>,
    ) -> Result<LeadRecord, LeadServiceError> {
        let mut record = self
            .leads
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status == LeadStatus::Archived {
            return Err(LeadServiceError::LeadArchived(lead_id.clone()));
        }

        record.contact_count += 1;
        record.last_contacted_at = Some(at);
        self.leads.update(record.clone())?;

        Ok(record)
    }

    /// Rank the current catalog against a stored lead.
    pub fn matches_for(
        &self,
        lead_id: &LeadId,
        as_of: DateTime<Utc>,
    ) -> Result<MatchOutcome, LeadServiceError> {
        let record = self
            .leads
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;

        let listings = self.catalog.all()?;
        let outcome = self.engine.matches(&record.lead, &listings, as_of)?;
        Ok(outcome)
    }

    /// Run the engine over an inline draft and catalog without persisting
    /// anything; backs the stateless preview endpoint.
    pub fn preview(
        &self,
        draft: LeadDraft,
        listings: &[Listing],
        as_of: DateTime<Utc>,
    ) -> Result<MatchOutcome, LeadServiceError> {
        let lead = self.guard.lead_from_draft(draft)?;
        let outcome = self.engine.matches(&lead, listings, as_of)?;
        Ok(outcome)
    }

    /// Archive every active lead whose verification lapsed at `as_of`.
    pub fn archive_expired(&self, as_of: DateTime<Utc>) -> Result<Vec<LeadId>, LeadServiceError> {
        let mut archived = Vec::new();

        for mut record in self.leads.active()? {
            if record.lead.verification_expired(as_of) {
                record.status = LeadStatus::Archived;
                let lead_id = record.lead.lead_id.clone();
                self.leads.update(record)?;
                archived.push(lead_id);
            }
        }

        if !archived.is_empty() {
            info!(count = archived.len(), "archived leads with lapsed verification");
        }

        Ok(archived)
    }

    /// Add a listing to the catalog.
    pub fn add_listing(&self, listing: Listing) -> Result<(), LeadServiceError> {
        super::intake::validate_listing(&listing)?;
        self.catalog.insert(listing)?;
        Ok(())
    }

    /// Replace a catalog listing. Rented listings are immutable.
    pub fn update_listing(&self, listing: Listing) -> Result<(), LeadServiceError> {
        super::intake::validate_listing(&listing)?;

        let existing = self
            .catalog
            .fetch(&listing.listing_id)?
            .ok_or(CatalogError::NotFound)?;

        if existing.status == ListingStatus::Rented {
            return Err(LeadServiceError::RentedListingImmutable(listing.listing_id));
        }

        self.catalog.replace(listing)?;
        Ok(())
    }
}

/// Error raised by the lead match service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Validation(#[from] LeadValidationError),
    #[error(transparent)]
    Listing(#[from] ListingValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("lead {0} is archived")]
    LeadArchived(LeadId),
    #[error("listing {0} is rented and can no longer change")]
    RentedListingImmutable(ListingId),
}
