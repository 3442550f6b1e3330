use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use clap::Args;

use crate::infra::{
    default_match_config, parse_date, InMemoryLeadRepository, InMemoryListingCatalog,
};
use leadmatch::crm::import::ListingCsvImporter;
use leadmatch::crm::leads::{
    BudgetRange, LeadDraft, LeadMatchService, LeadOrigin, Listing, ListingId, ListingStatus,
    MatchOutcome, MatchResult, MoveInWindow,
};
use leadmatch::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct MatchReportArgs {
    /// Lower bound of the lead's monthly budget
    #[arg(long)]
    budget_min: u32,
    /// Upper bound of the lead's monthly budget
    #[arg(long)]
    budget_max: u32,
    /// Minimum bedroom count the lead requires
    #[arg(long, default_value_t = 1)]
    min_bedrooms: u8,
    /// Preferred neighborhood (repeatable; omit to accept any)
    #[arg(long = "neighborhood")]
    neighborhoods: Vec<String>,
    /// Earliest acceptable move-in date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    move_in_start: NaiveDate,
    /// Latest acceptable move-in date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    move_in_end: NaiveDate,
    /// Path to a listing catalog CSV; a bundled sample is used when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the per-factor score breakdown for every match
    #[arg(long)]
    breakdown: bool,
}

pub(crate) fn run_match_report(args: MatchReportArgs) -> Result<(), AppError> {
    let catalog = match &args.catalog {
        Some(path) => ListingCsvImporter::from_path(path)?,
        None => sample_catalog(),
    };

    let draft = LeadDraft {
        budget: BudgetRange {
            min: args.budget_min,
            max: args.budget_max,
        },
        preferred_neighborhoods: args.neighborhoods.into_iter().collect::<BTreeSet<_>>(),
        min_bedrooms: args.min_bedrooms,
        move_in: MoveInWindow {
            start: args.move_in_start,
            end: args.move_in_end,
        },
        verification_expires_at: Utc::now() + Duration::days(60),
        origin: LeadOrigin::ManualEntry,
    };

    let service = build_in_memory_service()?;
    let outcome = service.preview(draft, &catalog, Utc::now())?;

    print_outcome(&outcome, true);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = build_in_memory_service()?;
    let now = Utc::now();

    println!("== Lead Match CRM demo ==\n");

    println!("1. A denied applicant enters the outreach pool:");
    let draft = LeadDraft {
        budget: BudgetRange {
            min: 2500,
            max: 3200,
        },
        preferred_neighborhoods: ["Park Slope".to_string()].into_iter().collect(),
        min_bedrooms: 2,
        move_in: MoveInWindow {
            start: sample_date(10, 1),
            end: sample_date(10, 31),
        },
        verification_expires_at: now + Duration::days(60),
        origin: LeadOrigin::DeniedApplicant,
    };
    let record = service.register(draft)?;
    println!(
        "   registered {} ({})\n",
        record.lead.lead_id,
        record.lead.origin.label()
    );

    println!("2. The listing catalog is loaded:");
    for listing in sample_catalog() {
        println!(
            "   {} | {} | ${}/mo | {} bd | available {} | {}",
            listing.listing_id,
            listing.neighborhood,
            listing.monthly_rent,
            listing.bedrooms,
            listing.available_on,
            listing.status.label()
        );
        service.add_listing(listing)?;
    }

    println!("\n3. Ranked matches for {}:", record.lead.lead_id);
    let outcome = service.matches_for(&record.lead.lead_id, now)?;
    print_outcome(&outcome, args.breakdown);

    println!("4. The agent reaches out:");
    let touched = service.record_contact(&record.lead.lead_id, now)?;
    println!(
        "   contact #{} recorded at {}\n",
        touched.contact_count,
        touched.last_contacted_at.expect("just stamped")
    );

    println!("5. An archive sweep after the verification lapses:");
    let archived = service.archive_expired(now + Duration::days(61))?;
    println!(
        "   archived: {:?}",
        archived.iter().map(ToString::to_string).collect::<Vec<_>>()
    );

    Ok(())
}

fn build_in_memory_service(
) -> Result<LeadMatchService<InMemoryLeadRepository, InMemoryListingCatalog>, AppError> {
    let service = LeadMatchService::new(
        Arc::new(InMemoryLeadRepository::default()),
        Arc::new(InMemoryListingCatalog::default()),
        default_match_config(),
    )?;
    Ok(service)
}

fn print_outcome(outcome: &MatchOutcome, breakdown: bool) {
    match outcome {
        MatchOutcome::NotEligible {
            lead_id,
            verification_expired_at,
        } => {
            println!(
                "   {} is not eligible: verification expired at {}\n",
                lead_id, verification_expired_at
            );
        }
        MatchOutcome::Eligible { matches, .. } => {
            if matches.is_empty() {
                println!("   no listings clear the relevance floor\n");
                return;
            }
            for (rank, result) in matches.iter().enumerate() {
                print_match(rank + 1, result, breakdown);
            }
            println!();
        }
    }
}

fn print_match(rank: usize, result: &MatchResult, breakdown: bool) {
    println!(
        "   #{rank} {} | score {:.1} | ${}/mo | available {}",
        result.listing_id, result.score, result.monthly_rent, result.available_on
    );
    if breakdown {
        for component in &result.components {
            println!(
                "        {:?} ({}%): {:.1} - {}",
                component.factor, component.weight, component.points, component.notes
            );
        }
    }
}

fn sample_catalog() -> Vec<Listing> {
    vec![
        sample_listing("unit-301", "Park Slope", 2600, 2, 5, ListingStatus::Active),
        sample_listing("unit-117", "Park Slope", 2550, 2, 12, ListingStatus::Active),
        sample_listing("unit-302", "Bushwick", 3100, 2, 12, ListingStatus::Active),
        sample_listing("unit-409", "Crown Heights", 2700, 3, 8, ListingStatus::Active),
        sample_listing("unit-220", "Park Slope", 2650, 2, 3, ListingStatus::Rented),
    ]
}

fn sample_listing(
    id: &str,
    neighborhood: &str,
    rent: u32,
    bedrooms: u8,
    day: u32,
    status: ListingStatus,
) -> Listing {
    Listing {
        listing_id: ListingId(id.to_string()),
        neighborhood: neighborhood.to_string(),
        monthly_rent: rent,
        bedrooms,
        available_on: sample_date(10, day),
        status,
    }
}

/// Sample dates land in October of next year so the demo window never sits
/// in the past.
fn sample_date(month: u32, day: u32) -> NaiveDate {
    let year = Utc::now().year() + 1;
    NaiveDate::from_ymd_opt(year, month, day).expect("valid sample date")
}
