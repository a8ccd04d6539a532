use crate::domains::logger::DomainLogger;
use chrono::Utc;
use log::{error as log_error, info as log_info, warn as log_warn};
use std::sync::Arc;

/// File-based DomainLogger adapter on top of `fast_log`.
struct FileBridge;

impl DomainLogger for FileBridge {
    fn info(&self, msg: &str) {
        log_info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log_warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log_error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }
}

/// Initialize `fast_log` writing to the given path and return a
/// DomainLogger bridged onto it. Fails when the global logger is already
/// installed or the file cannot be opened.
pub fn init_file_logger(path: &str) -> Result<Arc<dyn DomainLogger>, Box<dyn std::error::Error>> {
    fast_log::init(
        fast_log::config::Config::new()
            .file(path)
            .level(log::LevelFilter::Info),
    )?;
    Ok(Arc::new(FileBridge {}))
}
