use crate::domains::logger::DomainLogger;
use chrono::Utc;
use std::sync::Arc;

struct ConsoleBridge;

impl ConsoleBridge {
    fn line(level: &str, msg: &str) -> String {
        format!("{} {:5} {}", Utc::now().to_rfc3339(), level, msg)
    }
}

impl DomainLogger for ConsoleBridge {
    fn info(&self, msg: &str) {
        println!("{}", Self::line("INFO", msg));
    }
    fn warn(&self, msg: &str) {
        println!("{}", Self::line("WARN", msg));
    }
    fn error(&self, msg: &str) {
        eprintln!("{}", Self::line("ERROR", msg));
    }
}

/// Console-backed DomainLogger, the default when no log file is configured.
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleBridge {})
}
