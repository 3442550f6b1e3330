//! Lead outreach pool: intake, match scoring, outreach bookkeeping, and the
//! HTTP surface that exposes them.
//!
//! Leads enter the pool when an applicant is denied or drops out of an
//! active pipeline. They stay matchable until their identity verification
//! lapses, after which an archive sweep retires them from outreach.

pub mod domain;
pub(crate) mod intake;
pub mod matching;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BudgetRange, Lead, LeadDraft, LeadId, LeadOrigin, LeadStatus, Listing, ListingId,
    ListingStatus, MoveInWindow,
};
pub use intake::{LeadIntakeGuard, LeadValidationError, ListingValidationError};
pub use matching::{
    MatchConfig, MatchConfigError, MatchEngine, MatchFactor, MatchOutcome, MatchResult,
    ScoreComponent,
};
pub use repository::{
    CatalogError, LeadRecord, LeadRepository, LeadStatusView, ListingCatalog, RepositoryError,
};
pub use router::lead_router;
pub use service::{LeadMatchService, LeadServiceError};
