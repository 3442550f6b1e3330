use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for tracked leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for catalog listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the lead entered the outreach pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadOrigin {
    DeniedApplicant,
    RemovedFromPipeline,
    ManualEntry,
}

impl LeadOrigin {
    pub const fn label(self) -> &'static str {
        match self {
            LeadOrigin::DeniedApplicant => "denied_applicant",
            LeadOrigin::RemovedFromPipeline => "removed_from_pipeline",
            LeadOrigin::ManualEntry => "manual_entry",
        }
    }
}

/// Inclusive monthly-rent range the lead is willing to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: u32,
    pub max: u32,
}

impl BudgetRange {
    pub fn contains(&self, rent: u32) -> bool {
        (self.min..=self.max).contains(&rent)
    }

    pub fn midpoint(&self) -> f64 {
        (self.min as f64 + self.max as f64) / 2.0
    }
}

/// Inclusive date range in which the lead wants to take possession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MoveInWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Inbound lead descriptor, unvalidated until intake runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDraft {
    pub budget: BudgetRange,
    pub preferred_neighborhoods: BTreeSet<String>,
    pub min_bedrooms: u8,
    pub move_in: MoveInWindow,
    pub verification_expires_at: DateTime<Utc>,
    pub origin: LeadOrigin,
}

/// Validated preferences tracked for outreach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub lead_id: LeadId,
    pub budget: BudgetRange,
    pub preferred_neighborhoods: BTreeSet<String>,
    pub min_bedrooms: u8,
    pub move_in: MoveInWindow,
    pub verification_expires_at: DateTime<Utc>,
    pub origin: LeadOrigin,
}

impl Lead {
    /// Whether the lead's identity verification has lapsed at the given instant.
    pub fn verification_expired(&self, as_of: DateTime<Utc>) -> bool {
        self.verification_expires_at <= as_of
    }
}

/// Lifecycle of a tracked lead inside the outreach pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    Active,
    Archived,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::Active => "active",
            LeadStatus::Archived => "archived",
        }
    }
}

/// Marketplace state of a catalog listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Pending,
    Rented,
    Expired,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Pending => "pending",
            ListingStatus::Rented => "rented",
            ListingStatus::Expired => "expired",
        }
    }

    pub const fn is_active(self) -> bool {
        matches!(self, ListingStatus::Active)
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(ListingStatus::Active),
            "pending" => Some(ListingStatus::Pending),
            "rented" => Some(ListingStatus::Rented),
            "expired" => Some(ListingStatus::Expired),
            _ => None,
        }
    }
}

/// A rental unit in the catalog the engine matches against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub listing_id: ListingId,
    pub neighborhood: String,
    pub monthly_rent: u32,
    pub bedrooms: u8,
    pub available_on: NaiveDate,
    pub status: ListingStatus,
}
