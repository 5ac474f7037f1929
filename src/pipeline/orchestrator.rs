use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::app::ports::{ClaimOutcome, DedupStorePort, NotifierPort, ObjectStorePort};
use crate::domain::{EnrichedFinding, Outcome};
use crate::error::Result;
use crate::metrics::PipelineMetrics;
use crate::pipeline::{enrich, normalize};

/// Sequences one invocation: normalize, claim, enrich, persist, notify.
///
/// Collaborators are injected once at construction and live for the
/// process lifetime; the orchestrator itself holds no mutable state, so
/// invocations may run concurrently. The dedup claim is the only
/// synchronization point across invocations and happens before any
/// side effect.
pub struct PipelineOrchestrator {
    dedup: Arc<dyn DedupStorePort>,
    store: Arc<dyn ObjectStorePort>,
    notifier: Arc<dyn NotifierPort>,
    bucket: Option<String>,
    topic: String,
}

impl PipelineOrchestrator {
    pub fn new(
        dedup: Arc<dyn DedupStorePort>,
        store: Arc<dyn ObjectStorePort>,
        notifier: Arc<dyn NotifierPort>,
        bucket: Option<String>,
        topic: String,
    ) -> Self {
        Self {
            dedup,
            store,
            notifier,
            bucket,
            topic,
        }
    }

    /// Runs the pipeline for one delivered event.
    ///
    /// Returns `skipped` for duplicate deliveries. Dedup-store and
    /// object-store failures propagate so the delivery layer can retry
    /// the whole invocation; notification failures never do.
    pub async fn run(&self, event: &Value) -> Result<Outcome> {
        let raw = normalize::select_detail(event).clone();
        let finding = normalize::normalize(event);

        match self.dedup.claim(&finding.id).await? {
            ClaimOutcome::AlreadyClaimed => {
                info!(id = %finding.id, "duplicate delivery, skipping");
                PipelineMetrics::record_skipped();
                return Ok(Outcome::skipped(finding.id, "duplicate"));
            }
            ClaimOutcome::Claimed => {}
        }

        let enriched = enrich::enrich(&finding, &raw);
        self.persist(&enriched).await?;
        self.notify(&enriched).await;

        info!(id = %enriched.id, score = %enriched.score, "finding processed");
        PipelineMetrics::record_processed();
        Ok(Outcome::processed(enriched.id))
    }

    /// Writes the durable copy. Skipped silently when no bucket is
    /// configured; any write failure is a hard error, since loss of the
    /// durable copy is unacceptable.
    async fn persist(&self, record: &EnrichedFinding) -> Result<()> {
        let Some(bucket) = &self.bucket else {
            debug!(id = %record.id, "no bucket configured, skipping durable copy");
            return Ok(());
        };
        let key = format!("findings/{}.json", record.id);
        let body = serde_json::to_vec(record)?;
        self.store.put(bucket, &key, &body).await
    }

    /// Best-effort alerting: once the record is durably stored and
    /// deduped, a lost alert is recoverable, so publish failures are
    /// logged and absorbed rather than failing the invocation.
    async fn notify(&self, record: &EnrichedFinding) {
        let subject = format!("[ALERT] {} sev:{}", record.title, record.severity);
        let message = match serde_json::to_string(record) {
            Ok(m) => m,
            Err(e) => {
                warn!(id = %record.id, error = %e, "could not serialize alert body");
                PipelineMetrics::record_notify_failure();
                return;
            }
        };
        if let Err(e) = self.notifier.publish(&self.topic, &subject, &message).await {
            warn!(id = %record.id, error = %e, "alert publish failed, continuing");
            PipelineMetrics::record_notify_failure();
        }
    }
}
