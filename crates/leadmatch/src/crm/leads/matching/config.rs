use serde::{Deserialize, Serialize};

/// Rubric configuration describing the scoring weights and dials.
///
/// The 40/30/20/10 split mirrors the outreach pitch ("based on budget,
/// location, move-in date, and must-haves") but nothing downstream assumes
/// it; deployments tune the weights as long as they still sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub budget_weight: u8,
    pub neighborhood_weight: u8,
    pub bedroom_weight: u8,
    pub availability_weight: u8,
    /// Scores below this floor are not considered matches at all.
    pub relevance_floor: f32,
    /// Factor points granted when the listing has more bedrooms than asked.
    pub surplus_bedroom_credit: f32,
    /// Factor points lost per day the availability date sits outside the
    /// lead's move-in window.
    pub availability_decay_per_day: f32,
}

impl MatchConfig {
    /// Check the invariants the engine relies on, returning the config
    /// unchanged when they hold.
    pub fn validated(self) -> Result<Self, MatchConfigError> {
        let total = self.budget_weight as u16
            + self.neighborhood_weight as u16
            + self.bedroom_weight as u16
            + self.availability_weight as u16;
        if total != 100 {
            return Err(MatchConfigError::WeightSum { found: total });
        }

        if !(0.0..=100.0).contains(&self.relevance_floor) {
            return Err(MatchConfigError::FloorOutOfRange {
                found: self.relevance_floor,
            });
        }

        if !(0.0..=100.0).contains(&self.surplus_bedroom_credit) {
            return Err(MatchConfigError::CreditOutOfRange {
                found: self.surplus_bedroom_credit,
            });
        }

        if !self.availability_decay_per_day.is_finite() || self.availability_decay_per_day < 0.0 {
            return Err(MatchConfigError::NegativeDecay {
                found: self.availability_decay_per_day,
            });
        }

        Ok(self)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            budget_weight: 40,
            neighborhood_weight: 30,
            bedroom_weight: 20,
            availability_weight: 10,
            relevance_floor: 60.0,
            surplus_bedroom_credit: 60.0,
            availability_decay_per_day: 5.0,
        }
    }
}

/// Rejections raised when a rubric configuration is internally inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum MatchConfigError {
    #[error("factor weights must sum to 100, found {found}")]
    WeightSum { found: u16 },
    #[error("relevance floor must lie within 0..=100, found {found}")]
    FloorOutOfRange { found: f32 },
    #[error("surplus bedroom credit must lie within 0..=100, found {found}")]
    CreditOutOfRange { found: f32 },
    #[error("availability decay per day must be finite and non-negative, found {found}")]
    NegativeDecay { found: f32 },
}
