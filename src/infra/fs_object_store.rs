use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::app::ports::ObjectStorePort;
use crate::error::{PipelineError, Result};

/// Filesystem object store: a bucket is a directory under `root`, an
/// object is the file at `root/bucket/key`.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStorePort for FsObjectStore {
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.root.join(bucket).join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::Store(e.to_string()))?;
        }
        std::fs::write(&path, bytes).map_err(|e| PipelineError::Store(e.to_string()))?;
        debug!(bucket, key, size = bytes.len(), "object written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_creates_bucket_and_key_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        store
            .put("findings-bucket", "findings/f1.json", b"{}")
            .await
            .unwrap();

        let written = dir.path().join("findings-bucket/findings/f1.json");
        assert_eq!(std::fs::read(written).unwrap(), b"{}");
    }
}
