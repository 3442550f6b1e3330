use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Lead, LeadId, LeadStatus, Listing, ListingId};

/// Repository record holding the lead and its outreach bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub lead: Lead,
    pub status: LeadStatus,
    pub contact_count: u32,
    pub last_contacted_at: Option<DateTime<Utc>>,
}

impl LeadRecord {
    pub fn status_view(&self) -> LeadStatusView {
        LeadStatusView {
            lead_id: self.lead.lead_id.clone(),
            status: self.status.label(),
            origin: self.lead.origin.label(),
            contact_count: self.contact_count,
            last_contacted_at: self.last_contacted_at,
            verification_expires_at: self.lead.verification_expires_at,
        }
    }
}

/// Sanitized representation of a lead's exposed state. Applicant details
/// beyond the outreach bookkeeping stay out of API responses by policy.
#[derive(Debug, Clone, Serialize)]
pub struct LeadStatusView {
    pub lead_id: LeadId,
    pub status: &'static str,
    pub origin: &'static str,
    pub contact_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_contacted_at: Option<DateTime<Utc>>,
    pub verification_expires_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError>;
    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError>;
    fn active(&self) -> Result<Vec<LeadRecord>, RepositoryError>;
}

/// Error enumeration for lead repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Catalog abstraction over the listing inventory the engine matches against.
pub trait ListingCatalog: Send + Sync {
    fn insert(&self, listing: Listing) -> Result<(), CatalogError>;
    fn replace(&self, listing: Listing) -> Result<(), CatalogError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, CatalogError>;
    fn all(&self) -> Result<Vec<Listing>, CatalogError>;
}

/// Error enumeration for catalog failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("listing already exists")]
    Conflict,
    #[error("listing not found")]
    NotFound,
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
