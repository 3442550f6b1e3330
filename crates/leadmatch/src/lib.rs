//! Lead-to-listing matching for rental CRM outreach.
//!
//! The crate centers on [`crm::leads::matching::MatchEngine`], a pure scoring
//! pass that ranks active listings against a lead's stated preferences. The
//! surrounding modules supply the intake validation, repositories, CSV
//! catalog import, and HTTP routing that a CRM deployment wires together.

pub mod config;
pub mod crm;
pub mod error;
pub mod telemetry;
