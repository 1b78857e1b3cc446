// src/ledger/local.rs

//! Local filesystem ledger implementation.
//!
//! Stores one JSON file per contest under the ledger root:
//!
//! ```text
//! {root}/
//! └── contests/
//!     ├── 1a2b3c4d5e6f.json
//!     └── f6e5d4c3b2a1.json
//! ```
//!
//! Files are written atomically (temp file + rename) and mutations are
//! serialized behind an internal lock, which is what makes
//! `insert_if_absent` conflict-safe for concurrent callers in one process.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::ledger::Ledger;
use crate::models::{BalloonStatus, SubmissionRecord};

/// Local filesystem ledger backend.
pub struct LocalLedger {
    root_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalLedger {
    /// Create a new ledger rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Storage key for a contest's record file.
    fn contest_key(contest_id: &str) -> String {
        format!("contests/{contest_id}.json")
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load a contest's records, or an empty list when none exist yet.
    async fn load_contest(&self, contest_id: &str) -> Result<Vec<SubmissionRecord>> {
        Ok(self
            .read_json(&Self::contest_key(contest_id))
            .await?
            .unwrap_or_default())
    }

    /// Persist a contest's records.
    async fn save_contest(&self, contest_id: &str, records: &[SubmissionRecord]) -> Result<()> {
        self.write_json(&Self::contest_key(contest_id), records).await
    }
}

#[async_trait]
impl Ledger for LocalLedger {
    async fn find_by_key(
        &self,
        contest_id: &str,
        team_name: &str,
        problem_code: &str,
    ) -> Result<Option<SubmissionRecord>> {
        let records = self.load_contest(contest_id).await?;
        Ok(records
            .into_iter()
            .find(|r| r.natural_key() == (contest_id, team_name, problem_code)))
    }

    async fn insert_if_absent(&self, record: SubmissionRecord) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_contest(&record.contest_id).await?;
        if records.iter().any(|r| r.natural_key() == record.natural_key()) {
            return Ok(false);
        }

        let contest_id = record.contest_id.clone();
        records.push(record);
        self.save_contest(&contest_id, &records).await?;
        Ok(true)
    }

    async fn update_status(
        &self,
        record_id: &str,
        contest_id: &str,
        status: BalloonStatus,
    ) -> Result<SubmissionRecord> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_contest(contest_id).await?;
        let Some(record) = records
            .iter_mut()
            .find(|r| r.id == record_id && r.contest_id == contest_id)
        else {
            return Err(AppError::not_found(record_id));
        };

        record.status = status;
        let updated = record.clone();
        self.save_contest(contest_id, &records).await?;
        Ok(updated)
    }

    async fn delete_all_for_contest(&self, contest_id: &str) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let count = self.load_contest(contest_id).await?.len();
        if count > 0 {
            tokio::fs::remove_file(self.path(&Self::contest_key(contest_id))).await?;
        }
        Ok(count)
    }

    async fn list_for_contest(&self, contest_id: &str) -> Result<Vec<SubmissionRecord>> {
        let mut records = self.load_contest(contest_id).await?;
        records.sort_by(|a, b| {
            a.status
                .cmp(&b.status)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn record(contest_id: &str, team: &str, problem: &str, time: &str) -> SubmissionRecord {
        SubmissionRecord::new(contest_id, team, problem, time)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let tmp = TempDir::new().unwrap();
        let ledger = LocalLedger::new(tmp.path());

        assert!(ledger.insert_if_absent(record("c1", "Foo", "A", "10")).await.unwrap());

        let found = ledger.find_by_key("c1", "Foo", "A").await.unwrap().unwrap();
        assert_eq!(found.time, "10");
        assert!(ledger.find_by_key("c1", "Foo", "B").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_if_absent_keeps_first_time() {
        let tmp = TempDir::new().unwrap();
        let ledger = LocalLedger::new(tmp.path());

        assert!(ledger.insert_if_absent(record("c1", "Foo", "A", "10")).await.unwrap());
        assert!(!ledger.insert_if_absent(record("c1", "Foo", "A", "99")).await.unwrap());

        let found = ledger.find_by_key("c1", "Foo", "A").await.unwrap().unwrap();
        assert_eq!(found.time, "10");
        assert_eq!(ledger.list_for_contest("c1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_round_trip() {
        let tmp = TempDir::new().unwrap();
        let ledger = LocalLedger::new(tmp.path());

        let original = record("c1", "Foo", "A", "10");
        let id = original.id.clone();
        ledger.insert_if_absent(original).await.unwrap();

        let updated = ledger
            .update_status(&id, "c1", BalloonStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(updated.status, BalloonStatus::Delivered);

        let reverted = ledger
            .update_status(&id, "c1", BalloonStatus::Waiting)
            .await
            .unwrap();
        assert_eq!(reverted.status, BalloonStatus::Waiting);
    }

    #[tokio::test]
    async fn test_update_status_unknown_id() {
        let tmp = TempDir::new().unwrap();
        let ledger = LocalLedger::new(tmp.path());

        let err = ledger
            .update_status("nope", "c1", BalloonStatus::Delivered)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_status_out_of_contest_scope() {
        let tmp = TempDir::new().unwrap();
        let ledger = LocalLedger::new(tmp.path());

        let rec = record("c1", "Foo", "A", "10");
        let id = rec.id.clone();
        ledger.insert_if_absent(rec).await.unwrap();

        let err = ledger
            .update_status(&id, "c2", BalloonStatus::Delivered)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_scoped_to_contest() {
        let tmp = TempDir::new().unwrap();
        let ledger = LocalLedger::new(tmp.path());

        ledger.insert_if_absent(record("c1", "Foo", "A", "10")).await.unwrap();
        ledger.insert_if_absent(record("c1", "Bar", "B", "20")).await.unwrap();
        ledger.insert_if_absent(record("c2", "Baz", "A", "30")).await.unwrap();

        assert_eq!(ledger.delete_all_for_contest("c1").await.unwrap(), 2);
        assert_eq!(ledger.delete_all_for_contest("c1").await.unwrap(), 0);
        assert_eq!(ledger.list_for_contest("c2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_waiting_first_then_newest() {
        let tmp = TempDir::new().unwrap();
        let ledger = LocalLedger::new(tmp.path());

        let now = Utc::now();
        let mut early_delivered = record("c1", "Alpha", "A", "5");
        early_delivered.status = BalloonStatus::Delivered;
        early_delivered.created_at = now - Duration::minutes(30);

        let mut old_waiting = record("c1", "Beta", "B", "15");
        old_waiting.created_at = now - Duration::minutes(20);

        let mut new_waiting = record("c1", "Gamma", "C", "25");
        new_waiting.created_at = now;

        ledger.insert_if_absent(early_delivered).await.unwrap();
        ledger.insert_if_absent(new_waiting).await.unwrap();
        ledger.insert_if_absent(old_waiting).await.unwrap();

        let listed = ledger.list_for_contest("c1").await.unwrap();
        let teams: Vec<&str> = listed.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(teams, vec!["Gamma", "Beta", "Alpha"]);
    }

    #[tokio::test]
    async fn test_empty_contest_lists_empty() {
        let tmp = TempDir::new().unwrap();
        let ledger = LocalLedger::new(tmp.path());
        assert!(ledger.list_for_contest("missing").await.unwrap().is_empty());
    }
}
