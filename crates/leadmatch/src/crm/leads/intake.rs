use chrono::NaiveDate;

use super::domain::{BudgetRange, Lead, LeadDraft, LeadId, Listing, MoveInWindow};

/// Validation errors raised while admitting a lead into the outreach pool.
#[derive(Debug, thiserror::Error)]
pub enum LeadValidationError {
    #[error("budget minimum {min} exceeds maximum {max}")]
    BudgetInverted { min: u32, max: u32 },
    #[error("budget bounds must be positive")]
    BudgetNotPositive,
    #[error("move-in window starts {start} after it ends {end}")]
    MoveInWindowInverted { start: NaiveDate, end: NaiveDate },
}

/// Validation errors raised while admitting a listing into the catalog.
#[derive(Debug, thiserror::Error)]
pub enum ListingValidationError {
    #[error("monthly rent must be positive")]
    RentNotPositive,
    #[error("neighborhood must not be blank")]
    BlankNeighborhood,
}

/// Guard responsible for producing validated [`Lead`] instances.
#[derive(Debug, Clone, Default)]
pub struct LeadIntakeGuard;

impl LeadIntakeGuard {
    /// Convert an inbound draft into a tracked lead, failing fast on
    /// malformed preferences rather than letting them reach the engine.
    pub fn lead_from_draft(&self, draft: LeadDraft) -> Result<Lead, LeadValidationError> {
        validate_terms(&draft.budget, &draft.move_in)?;

        Ok(Lead {
            lead_id: LeadId("pending".to_string()),
            budget: draft.budget,
            preferred_neighborhoods: draft.preferred_neighborhoods,
            min_bedrooms: draft.min_bedrooms,
            move_in: draft.move_in,
            verification_expires_at: draft.verification_expires_at,
            origin: draft.origin,
        })
    }
}

pub(crate) fn validate_terms(
    budget: &BudgetRange,
    move_in: &MoveInWindow,
) -> Result<(), LeadValidationError> {
    if budget.min == 0 || budget.max == 0 {
        return Err(LeadValidationError::BudgetNotPositive);
    }

    if budget.min > budget.max {
        return Err(LeadValidationError::BudgetInverted {
            min: budget.min,
            max: budget.max,
        });
    }

    if move_in.start > move_in.end {
        return Err(LeadValidationError::MoveInWindowInverted {
            start: move_in.start,
            end: move_in.end,
        });
    }

    Ok(())
}

pub(crate) fn validate_listing(listing: &Listing) -> Result<(), ListingValidationError> {
    if listing.monthly_rent == 0 {
        return Err(ListingValidationError::RentNotPositive);
    }

    if listing.neighborhood.trim().is_empty() {
        return Err(ListingValidationError::BlankNeighborhood);
    }

    Ok(())
}
