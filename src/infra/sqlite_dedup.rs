use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode};

use crate::app::ports::{ClaimOutcome, DedupStorePort};
use crate::domain::DedupRecord;
use crate::error::{PipelineError, Result};

/// SQLite-backed dedup store.
///
/// One row per distinct finding id; the primary key makes the INSERT the
/// atomic check-and-set, so concurrent claims for the same id resolve in
/// the database, not in application code.
pub struct SqliteDedupStore {
    conn: Mutex<Connection>,
}

impl SqliteDedupStore {
    pub fn open_at<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path).map_err(db_err)?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            CREATE TABLE IF NOT EXISTS dedup_claims (
                finding_id TEXT PRIMARY KEY,
                claimed_at INTEGER NOT NULL
            );
            "#,
        )
        .map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl DedupStorePort for SqliteDedupStore {
    async fn claim(&self, finding_id: &str) -> Result<ClaimOutcome> {
        let record = DedupRecord {
            finding_id: finding_id.to_string(),
            claimed_at: Utc::now().timestamp(),
        };
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT INTO dedup_claims (finding_id, claimed_at) VALUES (?1, ?2)",
            params![record.finding_id, record.claimed_at],
        );
        match inserted {
            Ok(_) => Ok(ClaimOutcome::Claimed),
            // Key already exists: recognized duplicate, not an error
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Ok(ClaimOutcome::AlreadyClaimed)
            }
            // Anything else (locked, corrupt, disk full) propagates
            Err(e) => Err(db_err(e)),
        }
    }
}

fn db_err(e: rusqlite::Error) -> PipelineError {
    PipelineError::Dedup(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_claim_reports_already_claimed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteDedupStore::open_at(dir.path().join("claims.db")).unwrap();

        assert_eq!(store.claim("f1").await.unwrap(), ClaimOutcome::Claimed);
        assert_eq!(
            store.claim("f1").await.unwrap(),
            ClaimOutcome::AlreadyClaimed
        );
        assert_eq!(store.claim("f2").await.unwrap(), ClaimOutcome::Claimed);
    }

    #[tokio::test]
    async fn test_claims_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("claims.db");

        {
            let store = SqliteDedupStore::open_at(&db_path).unwrap();
            assert_eq!(store.claim("f1").await.unwrap(), ClaimOutcome::Claimed);
        }

        let store = SqliteDedupStore::open_at(&db_path).unwrap();
        assert_eq!(
            store.claim("f1").await.unwrap(),
            ClaimOutcome::AlreadyClaimed
        );
    }
}
