//! CRM surfaces: the lead outreach pool and its listing catalog tooling.

pub mod import;
pub mod leads;
