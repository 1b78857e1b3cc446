// src/models/mod.rs

//! Domain models for the balloon tracker.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod candidate;
mod config;
mod record;

// Re-export all public types
pub use candidate::SubmissionCandidate;
pub use config::{Config, FetcherConfig, PollerConfig, StandingsSelectors};
pub use record::{BalloonStatus, SubmissionRecord};
