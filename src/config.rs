use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub engine: EngineConfig,
    pub store: StoreConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity given to partners registered without an explicit one.
    pub default_capacity: u32,
    /// Upper bound on pending orders processed per run; None means all.
    pub max_batch_size: Option<usize>,
    /// Success-rate percentage under which a completed run logs a warning.
    pub success_rate_alert: f64,
    /// Seconds between automatic assignment runs.
    pub run_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot file backing the entity store. None keeps entities
    /// in memory, seeded with demo data.
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Directory for the JSONL run history. None keeps history in memory.
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file path; console-only when absent.
    pub file: Option<String>,
}

impl DispatchConfig {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: DispatchConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                default_capacity: 3,
                max_batch_size: None,
                success_rate_alert: 80.0,
                run_interval_secs: 30,
            },
            store: StoreConfig { seed_file: None },
            history: HistoryConfig { dir: None },
            logging: LoggingConfig { file: None },
        }
    }
}
