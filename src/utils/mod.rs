// src/utils/mod.rs

//! Utility functions and helpers.

use sha2::{Digest, Sha256};
use url::Url;

/// Hex-encoded SHA-256 digest of `input`, truncated to `len` characters.
pub fn short_hash(input: &str, len: usize) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(len);
    hex
}

/// Derive the contest id from the standings URL.
///
/// The id must be deterministic so that restarting the tracker against the
/// same URL lands in the same ledger scope. URLs that parse are normalized
/// first (scheme/host casing, default ports); unparseable input is hashed
/// as-is so the parser/fetcher can surface the real failure later.
pub fn contest_id_for_url(contest_url: &str) -> String {
    let trimmed = contest_url.trim();
    let canonical = Url::parse(trimmed)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| trimmed.to_string());
    short_hash(&canonical, 12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash_truncates() {
        assert_eq!(short_hash("abc", 12).len(), 12);
        assert_eq!(short_hash("abc", 16).len(), 16);
    }

    #[test]
    fn test_contest_id_deterministic() {
        let a = contest_id_for_url("https://judge.example.com/contest/1");
        let b = contest_id_for_url("https://judge.example.com/contest/1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn test_contest_id_normalizes_host_case() {
        let a = contest_id_for_url("https://Judge.Example.com/contest/1");
        let b = contest_id_for_url("https://judge.example.com/contest/1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_contest_id_distinguishes_contests() {
        let a = contest_id_for_url("https://judge.example.com/contest/1");
        let b = contest_id_for_url("https://judge.example.com/contest/2");
        assert_ne!(a, b);
    }

    #[test]
    fn test_contest_id_accepts_unparseable_input() {
        let id = contest_id_for_url("not a url");
        assert_eq!(id.len(), 12);
    }
}
