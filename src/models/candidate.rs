// src/models/candidate.rs

//! Parsed standings-cell candidate, before reconciliation.

/// An accepted submission as seen on the standings page.
///
/// Candidates carry no contest scope, status, or identity; the reconciler
/// decides whether each one becomes a ledger record, then they are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionCandidate {
    /// Team display name, trimmed
    pub team_name: String,

    /// Problem short code from the header row
    pub problem_code: String,

    /// Minutes from contest start at acceptance, as scraped
    pub time: String,
}

impl SubmissionCandidate {
    pub fn new(
        team_name: impl Into<String>,
        problem_code: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            team_name: team_name.into(),
            problem_code: problem_code.into(),
            time: time.into(),
        }
    }
}
