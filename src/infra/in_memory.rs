use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::app::ports::{ClaimOutcome, DedupStorePort, NotifierPort, ObjectStorePort};
use crate::domain::DedupRecord;
use crate::error::Result;

/// In-memory dedup store for tests and dry runs. The mutexed map makes
/// the claim atomic across concurrent invocations in-process.
#[derive(Default)]
pub struct MemoryDedupStore {
    claimed: Mutex<HashMap<String, DedupRecord>>,
}

impl MemoryDedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DedupRecord> {
        self.claimed.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl DedupStorePort for MemoryDedupStore {
    async fn claim(&self, finding_id: &str) -> Result<ClaimOutcome> {
        let mut claimed = self.claimed.lock().unwrap();
        if claimed.contains_key(finding_id) {
            return Ok(ClaimOutcome::AlreadyClaimed);
        }
        claimed.insert(
            finding_id.to_string(),
            DedupRecord {
                finding_id: finding_id.to_string(),
                claimed_at: Utc::now().timestamp(),
            },
        );
        Ok(ClaimOutcome::Claimed)
    }
}

/// In-memory object store keyed by `bucket/key`.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let objects = self.objects.lock().unwrap();
        objects.get(&format!("{}/{}", bucket, key)).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let objects = self.objects.lock().unwrap();
        objects.keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStorePort for MemoryObjectStore {
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<()> {
        let mut objects = self.objects.lock().unwrap();
        objects.insert(format!("{}/{}", bucket, key), bytes.to_vec());
        debug!(bucket, key, "object stored in memory");
        Ok(())
    }
}

/// In-memory notifier that records every publish for inspection.
#[derive(Default)]
pub struct MemoryNotifier {
    published: Mutex<Vec<PublishedAlert>>,
}

#[derive(Debug, Clone)]
pub struct PublishedAlert {
    pub topic: String,
    pub subject: String,
    pub message: String,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<PublishedAlert> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotifierPort for MemoryNotifier {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<()> {
        let mut published = self.published.lock().unwrap();
        published.push(PublishedAlert {
            topic: topic.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
