use async_trait::async_trait;

use crate::error::Result;

/// Result of attempting to claim a finding id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// This invocation owns the id and may perform side effects.
    Claimed,
    /// A previous (or concurrent) invocation already claimed the id.
    AlreadyClaimed,
}

/// Durable keyed store providing atomic insert-if-absent on finding ids.
///
/// Implementations decide duplicate-vs-error once at this boundary: a
/// key-already-exists condition maps to `AlreadyClaimed`, anything else
/// is an error the caller must propagate (fail-closed). The claim must
/// be a single atomic check-and-set in the backing store, never a
/// read-then-write in application code.
#[async_trait]
pub trait DedupStorePort: Send + Sync {
    async fn claim(&self, finding_id: &str) -> Result<ClaimOutcome>;
}

/// Object store accepting whole-object writes keyed by bucket and path.
#[async_trait]
pub trait ObjectStorePort: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<()>;
}

/// Downstream alerting channel.
#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<()>;
}
