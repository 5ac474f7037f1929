use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use findings_ingest::app::ports::{DedupStorePort, NotifierPort, ObjectStorePort};
use findings_ingest::config::Config;
use findings_ingest::domain::Status;
use findings_ingest::infra::fs_object_store::FsObjectStore;
use findings_ingest::infra::in_memory::{MemoryDedupStore, MemoryNotifier, MemoryObjectStore};
use findings_ingest::infra::sqlite_dedup::SqliteDedupStore;
use findings_ingest::infra::webhook_notifier::WebhookNotifier;
use findings_ingest::metrics::PipelineMetrics;
use findings_ingest::pipeline::orchestrator::PipelineOrchestrator;
use findings_ingest::{logging, metrics};

#[derive(Parser)]
#[command(name = "findings_ingest")]
#[command(about = "Security-finding ingestion pipeline: dedupe, enrich, persist, alert")]
#[command(version = "0.1.0")]
struct Cli {
    /// Use in-memory collaborators instead of the configured backends
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single delivered event from a JSON file ('-' for stdin)
    Process {
        /// Path to the event JSON
        #[arg(long)]
        event: PathBuf,
    },
    /// Process a newline-delimited JSON stream of events, one invocation per line
    Drain {
        /// Path to the ndjson file
        #[arg(long)]
        events: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    metrics::init_metrics();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let orchestrator = build_orchestrator(&config, cli.dry_run)?;

    match cli.command {
        Commands::Process { event } => {
            let event = read_event(&event)?;
            match orchestrator.run(&event).await {
                Ok(outcome) => println!("{}", serde_json::to_string(&outcome)?),
                Err(e) => {
                    error!("invocation failed: {}", e);
                    PipelineMetrics::record_invocation_failure();
                    std::process::exit(1);
                }
            }
        }
        Commands::Drain { events } => {
            let text = std::fs::read_to_string(&events)?;
            let mut processed = 0usize;
            let mut skipped = 0usize;
            let mut failures = 0usize;

            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                let event: serde_json::Value = match serde_json::from_str(line) {
                    Ok(v) => v,
                    Err(e) => {
                        error!("unparseable event line: {}", e);
                        failures += 1;
                        continue;
                    }
                };
                match orchestrator.run(&event).await {
                    Ok(outcome) if outcome.status == Status::Processed => processed += 1,
                    Ok(_) => skipped += 1,
                    Err(e) => {
                        error!("invocation failed: {}", e);
                        PipelineMetrics::record_invocation_failure();
                        failures += 1;
                    }
                }
            }

            info!(processed, skipped, failures, "drain finished");
            println!("processed: {processed}");
            println!("skipped: {skipped}");
            println!("failures: {failures}");
            if failures > 0 {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn build_orchestrator(config: &Config, dry_run: bool) -> anyhow::Result<PipelineOrchestrator> {
    let (dedup, store, notifier): (
        Arc<dyn DedupStorePort>,
        Arc<dyn ObjectStorePort>,
        Arc<dyn NotifierPort>,
    ) = if dry_run {
        (
            Arc::new(MemoryDedupStore::new()),
            Arc::new(MemoryObjectStore::new()),
            Arc::new(MemoryNotifier::new()),
        )
    } else {
        (
            Arc::new(SqliteDedupStore::open_at(&config.dedup_db_path)?),
            Arc::new(FsObjectStore::new(&config.data_root)),
            Arc::new(WebhookNotifier::new()),
        )
    };

    Ok(PipelineOrchestrator::new(
        dedup,
        store,
        notifier,
        config.findings_bucket.clone(),
        config.alert_topic.clone(),
    ))
}

fn read_event(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&text)?)
}
