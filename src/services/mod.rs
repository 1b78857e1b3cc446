// src/services/mod.rs

//! Service layer for standings ingestion.
//!
//! - Fetching raw standings markup (`StandingsSource`, `HttpStandingsSource`)
//! - Parsing it into submission candidates (`StandingsParser`)

mod fetcher;
mod parser;

pub use fetcher::{HttpStandingsSource, StandingsSource};
pub use parser::{SKIPPED_LEADING_CELLS, StandingsParser};
