mod config;
mod scoring;

pub use config::{MatchConfig, MatchConfigError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Lead, LeadId, Listing, ListingId};
use super::intake::{self, LeadValidationError};

/// Stateless engine applying the scoring rubric to a lead and a catalog.
///
/// The engine only reads its inputs; identical calls yield identical
/// outcomes and concurrent use needs no coordination.
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Rank the catalog against the lead's preferences at the given instant.
    ///
    /// Malformed lead terms fail fast; an expired verification yields an
    /// explicit [`MatchOutcome::NotEligible`] rather than an empty list.
    pub fn matches(
        &self,
        lead: &Lead,
        listings: &[Listing],
        as_of: DateTime<Utc>,
    ) -> Result<MatchOutcome, LeadValidationError> {
        intake::validate_terms(&lead.budget, &lead.move_in)?;

        if lead.verification_expired(as_of) {
            return Ok(MatchOutcome::NotEligible {
                lead_id: lead.lead_id.clone(),
                verification_expired_at: lead.verification_expires_at,
            });
        }

        let mut ranked: Vec<MatchResult> = listings
            .iter()
            .filter(|listing| listing.status.is_active())
            .filter(|listing| lead.budget.contains(listing.monthly_rent))
            .filter(|listing| listing.bedrooms >= lead.min_bedrooms)
            .map(|listing| {
                let (components, score) = scoring::score_listing(lead, listing, &self.config);
                MatchResult {
                    lead_id: lead.lead_id.clone(),
                    listing_id: listing.listing_id.clone(),
                    score,
                    monthly_rent: listing.monthly_rent,
                    available_on: listing.available_on,
                    components,
                }
            })
            .filter(|result| result.score >= self.config.relevance_floor)
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.monthly_rent.cmp(&b.monthly_rent))
                .then_with(|| a.available_on.cmp(&b.available_on))
        });

        Ok(MatchOutcome::Eligible {
            lead_id: lead.lead_id.clone(),
            matches: ranked,
        })
    }
}

/// Result of a ranking pass over the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Eligible {
        lead_id: LeadId,
        matches: Vec<MatchResult>,
    },
    /// Distinct from an eligible-but-empty result: the lead cannot receive
    /// match notifications until re-verified.
    NotEligible {
        lead_id: LeadId,
        verification_expired_at: DateTime<Utc>,
    },
}

impl MatchOutcome {
    pub fn is_eligible(&self) -> bool {
        matches!(self, MatchOutcome::Eligible { .. })
    }

    /// Ranked matches, empty when the lead is not eligible.
    pub fn ranked(&self) -> &[MatchResult] {
        match self {
            MatchOutcome::Eligible { matches, .. } => matches,
            MatchOutcome::NotEligible { .. } => &[],
        }
    }
}

/// A scored (lead, listing) pair; recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub lead_id: LeadId,
    pub listing_id: ListingId,
    pub score: f32,
    pub monthly_rent: u32,
    pub available_on: NaiveDate,
    pub components: Vec<ScoreComponent>,
}

/// Factors permitted in the scoring rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    BudgetFit,
    Neighborhood,
    Bedrooms,
    Availability,
}

/// Discrete contribution to a score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: MatchFactor,
    pub points: f32,
    pub weight: u8,
    pub notes: String,
}
