// src/models/record.rs

//! Ledger record for a detected accepted submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::short_hash;

/// Delivery state of a balloon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalloonStatus {
    /// Balloon owed, not yet handed out
    Waiting,
    /// Balloon delivered to the team
    Delivered,
}

impl BalloonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalloonStatus::Waiting => "waiting",
            BalloonStatus::Delivered => "delivered",
        }
    }
}

/// A persisted accepted-submission record.
///
/// The triple (`contest_id`, `team_name`, `problem_code`) is the natural key:
/// a team holds at most one record per problem per contest. The first detected
/// acceptance wins; later detections of the same triple never overwrite `time`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionRecord {
    /// Stable id derived from the natural key
    pub id: String,

    /// Contest scope, derived from the contest URL
    pub contest_id: String,

    /// Team display name, trimmed and non-empty
    pub team_name: String,

    /// Problem short code (single uppercase letter on the supported judge)
    pub problem_code: String,

    /// Minutes from contest start at acceptance, as scraped ("N/A" if unknown)
    pub time: String,

    /// Balloon delivery state
    pub status: BalloonStatus,

    /// When this record was first ingested (not the contest clock)
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Create a fresh record in the `Waiting` state.
    pub fn new(
        contest_id: impl Into<String>,
        team_name: impl Into<String>,
        problem_code: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        let contest_id = contest_id.into();
        let team_name = team_name.into();
        let problem_code = problem_code.into();
        let id = Self::derive_id(&contest_id, &team_name, &problem_code);

        Self {
            id,
            contest_id,
            team_name,
            problem_code,
            time: time.into(),
            status: BalloonStatus::Waiting,
            created_at: Utc::now(),
        }
    }

    /// Derive the stable record id from the natural key.
    pub fn derive_id(contest_id: &str, team_name: &str, problem_code: &str) -> String {
        short_hash(&format!("{contest_id}\x1f{team_name}\x1f{problem_code}"), 16)
    }

    /// The natural key as a borrow tuple.
    pub fn natural_key(&self) -> (&str, &str, &str) {
        (&self.contest_id, &self.team_name, &self.problem_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = SubmissionRecord::new("c1", "Team Rocket", "A", "42");
        assert_eq!(record.status, BalloonStatus::Waiting);
        assert_eq!(record.natural_key(), ("c1", "Team Rocket", "A"));
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_derive_id_stable() {
        let a = SubmissionRecord::derive_id("c1", "Foo", "B");
        let b = SubmissionRecord::derive_id("c1", "Foo", "B");
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_id_distinguishes_key_parts() {
        // The separator keeps ("ab", "c") and ("a", "bc") apart.
        let a = SubmissionRecord::derive_id("c1", "ab", "c");
        let b = SubmissionRecord::derive_id("c1", "a", "bc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&BalloonStatus::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");
        let status: BalloonStatus = serde_json::from_str("\"waiting\"").unwrap();
        assert_eq!(status, BalloonStatus::Waiting);
    }
}
