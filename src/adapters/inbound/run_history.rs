use crate::domains::assignment::{AssignmentResult, HistoryPoint, RunHistory, RunMetrics};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// In-memory run history for testing and development.
#[derive(Debug, Default)]
pub struct InMemoryRunHistory {
    runs: RwLock<Vec<RunMetrics>>,
    results: RwLock<Vec<AssignmentResult>>,
}

impl InMemoryRunHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunHistory for InMemoryRunHistory {
    async fn append_run(
        &self,
        metrics: RunMetrics,
        results: Vec<AssignmentResult>,
    ) -> Result<(), String> {
        self.runs.write().await.push(metrics);
        self.results.write().await.extend(results);
        Ok(())
    }

    async fn record_result(&self, result: AssignmentResult) -> Result<(), String> {
        self.results.write().await.push(result);
        Ok(())
    }

    async fn latest_metrics(&self) -> Result<Option<RunMetrics>, String> {
        Ok(self.runs.read().await.last().cloned())
    }

    async fn metrics_series(&self) -> Result<Vec<HistoryPoint>, String> {
        Ok(self
            .runs
            .read()
            .await
            .iter()
            .map(RunMetrics::history_point)
            .collect())
    }

    async fn recent_results(&self, limit: usize) -> Result<Vec<AssignmentResult>, String> {
        Ok(self
            .results
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn all_results(&self) -> Result<Vec<AssignmentResult>, String> {
        Ok(self.results.read().await.clone())
    }
}

/// File-backed run history in JSON Lines format: `runs.jsonl` carries one
/// RunMetrics per line, `results.jsonl` one AssignmentResult per line.
/// Append-only, so history survives restarts and is shareable between
/// processes through the file system.
pub struct FileRunHistory {
    dir: PathBuf,
}

impl FileRunHistory {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn runs_path(&self) -> PathBuf {
        self.dir.join("runs.jsonl")
    }

    fn results_path(&self) -> PathBuf {
        self.dir.join("results.jsonl")
    }

    async fn append_line<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| format!("Failed to create history directory: {}", e))?;

        let line = serde_json::to_string(value)
            .map_err(|e| format!("Failed to serialize history entry: {}", e))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| format!("Failed to open history file {}: {}", path.display(), e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| format!("Failed to write history entry: {}", e))?;
        file.write_all(b"\n")
            .await
            .map_err(|e| format!("Failed to write newline: {}", e))?;
        file.flush()
            .await
            .map_err(|e| format!("Failed to flush history file: {}", e))
    }

    async fn read_lines<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>, String> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read history file {}: {}", path.display(), e))?;

        let mut entries = Vec::new();
        for (number, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: T = serde_json::from_str(line).map_err(|e| {
                format!(
                    "Failed to parse history entry at line {}: {}",
                    number + 1,
                    e
                )
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

#[async_trait]
impl RunHistory for FileRunHistory {
    async fn append_run(
        &self,
        metrics: RunMetrics,
        results: Vec<AssignmentResult>,
    ) -> Result<(), String> {
        self.append_line(&self.runs_path(), &metrics).await?;
        for result in &results {
            self.append_line(&self.results_path(), result).await?;
        }
        Ok(())
    }

    async fn record_result(&self, result: AssignmentResult) -> Result<(), String> {
        self.append_line(&self.results_path(), &result).await
    }

    async fn latest_metrics(&self) -> Result<Option<RunMetrics>, String> {
        let runs: Vec<RunMetrics> = self.read_lines(&self.runs_path()).await?;
        Ok(runs.into_iter().last())
    }

    async fn metrics_series(&self) -> Result<Vec<HistoryPoint>, String> {
        let runs: Vec<RunMetrics> = self.read_lines(&self.runs_path()).await?;
        Ok(runs.iter().map(RunMetrics::history_point).collect())
    }

    async fn recent_results(&self, limit: usize) -> Result<Vec<AssignmentResult>, String> {
        let mut results: Vec<AssignmentResult> = self.read_lines(&self.results_path()).await?;
        results.reverse();
        results.truncate(limit);
        Ok(results)
    }

    async fn all_results(&self) -> Result<Vec<AssignmentResult>, String> {
        self.read_lines(&self.results_path()).await
    }
}
