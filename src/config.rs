use std::env;
use std::path::PathBuf;

use crate::error::{PipelineError, Result};

/// Process-wide configuration, resolved once at startup from the
/// environment (a `.env` file is honored in development). Never read
/// per-event.
#[derive(Debug, Clone)]
pub struct Config {
    /// Webhook endpoint alerts are published to. Required.
    pub alert_topic: String,
    /// Object-store bucket for durable copies. Absent means persistence
    /// is skipped silently.
    pub findings_bucket: Option<String>,
    /// SQLite database file backing the dedup claim table.
    pub dedup_db_path: PathBuf,
    /// Root directory of the filesystem object store.
    pub data_root: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let alert_topic = env::var("ALERT_TOPIC").map_err(|_| {
            PipelineError::Config("ALERT_TOPIC must be set (alert webhook endpoint)".to_string())
        })?;

        let data_root =
            PathBuf::from(env::var("DATA_ROOT").unwrap_or_else(|_| "data".to_string()));
        let dedup_db_path = env::var("DEDUP_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_root.join("dedup").join("claims.db"));

        Ok(Self {
            alert_topic,
            findings_bucket: env::var("FINDINGS_BUCKET").ok().filter(|s| !s.is_empty()),
            dedup_db_path,
            data_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize the tests that
    // touch them so they cannot race each other.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in ["ALERT_TOPIC", "FINDINGS_BUCKET", "DEDUP_DB_PATH", "DATA_ROOT"] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_missing_alert_topic_is_a_config_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_empty_bucket_means_no_persistence() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var("ALERT_TOPIC", "https://alerts.example.com/hook");
        env::set_var("FINDINGS_BUCKET", "");

        let config = Config::from_env().unwrap();
        assert_eq!(config.alert_topic, "https://alerts.example.com/hook");
        assert_eq!(config.findings_bucket, None);

        env::set_var("FINDINGS_BUCKET", "findings-bucket");
        let config = Config::from_env().unwrap();
        assert_eq!(config.findings_bucket.as_deref(), Some("findings-bucket"));
    }

    #[test]
    fn test_dedup_db_defaults_under_data_root() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var("ALERT_TOPIC", "https://alerts.example.com/hook");
        env::set_var("DATA_ROOT", "/var/lib/findings");

        let config = Config::from_env().unwrap();
        assert_eq!(config.data_root, PathBuf::from("/var/lib/findings"));
        assert_eq!(
            config.dedup_db_path,
            PathBuf::from("/var/lib/findings/dedup/claims.db")
        );

        env::set_var("DEDUP_DB_PATH", "/tmp/claims.db");
        let config = Config::from_env().unwrap();
        assert_eq!(config.dedup_db_path, PathBuf::from("/tmp/claims.db"));
    }
}
