use super::super::domain::{BudgetRange, Lead, Listing, MoveInWindow};
use super::config::MatchConfig;
use super::{MatchFactor, ScoreComponent};

pub(crate) fn score_listing(
    lead: &Lead,
    listing: &Listing,
    config: &MatchConfig,
) -> (Vec<ScoreComponent>, f32) {
    let mut components = Vec::new();

    // An empty preference set satisfies the neighborhood factor outright and
    // its weight folds into budget fit.
    let neighborhood_open = lead.preferred_neighborhoods.is_empty();
    let budget_weight = if neighborhood_open {
        config.budget_weight + config.neighborhood_weight
    } else {
        config.budget_weight
    };

    let budget_points = budget_fit(&lead.budget, listing.monthly_rent);
    components.push(ScoreComponent {
        factor: MatchFactor::BudgetFit,
        points: budget_points,
        weight: budget_weight,
        notes: format!(
            "rent {} against budget {}-{}",
            listing.monthly_rent, lead.budget.min, lead.budget.max
        ),
    });

    if !neighborhood_open {
        let in_set = lead.preferred_neighborhoods.contains(&listing.neighborhood);
        components.push(ScoreComponent {
            factor: MatchFactor::Neighborhood,
            points: if in_set { 100.0 } else { 0.0 },
            weight: config.neighborhood_weight,
            notes: if in_set {
                format!("{} is a preferred neighborhood", listing.neighborhood)
            } else {
                format!("{} is outside the preferred set", listing.neighborhood)
            },
        });
    }

    let bedroom_points = if listing.bedrooms == lead.min_bedrooms {
        100.0
    } else {
        config.surplus_bedroom_credit
    };
    components.push(ScoreComponent {
        factor: MatchFactor::Bedrooms,
        points: bedroom_points,
        weight: config.bedroom_weight,
        notes: format!(
            "{} bedroom(s) against a minimum of {}",
            listing.bedrooms, lead.min_bedrooms
        ),
    });

    let days_outside = days_outside_window(&lead.move_in, listing.available_on);
    let availability_points = if days_outside == 0 {
        100.0
    } else {
        (100.0 - config.availability_decay_per_day * days_outside as f32).max(0.0)
    };
    components.push(ScoreComponent {
        factor: MatchFactor::Availability,
        points: availability_points,
        weight: config.availability_weight,
        notes: if days_outside == 0 {
            format!("available {} inside the move-in window", listing.available_on)
        } else {
            format!(
                "available {} is {} day(s) outside the move-in window",
                listing.available_on, days_outside
            )
        },
    });

    let total = components
        .iter()
        .map(|component| component.points * component.weight as f32 / 100.0)
        .sum();

    (components, total)
}

/// 100 at or below the budget midpoint, decaying linearly to 0 at the cap.
fn budget_fit(budget: &BudgetRange, rent: u32) -> f32 {
    let midpoint = budget.midpoint();
    let rent = rent as f64;
    if rent <= midpoint {
        return 100.0;
    }

    let span = budget.max as f64 - midpoint;
    if span <= 0.0 {
        return 100.0;
    }

    (100.0 * (budget.max as f64 - rent) / span) as f32
}

fn days_outside_window(window: &MoveInWindow, available_on: chrono::NaiveDate) -> i64 {
    if window.contains(available_on) {
        0
    } else if available_on < window.start {
        (window.start - available_on).num_days()
    } else {
        (available_on - window.end).num_days()
    }
}
