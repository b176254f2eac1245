//! design-tracker: SLA status derivation and reporting for design projects
//!
//! Loads a tabular snapshot of project records, derives per-row status fields
//! (days since kickoff, expected completion, SLA status), filters and
//! aggregates the result, and renders exports and reports.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod derive;
pub mod domain;
pub mod filter;
pub mod ingest;
pub mod render;
pub mod utils;
