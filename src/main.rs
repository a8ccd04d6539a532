use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use delivery_dispatch::adapters::inbound::{
    fixtures, FileEntityStore, FileRunHistory, InMemoryEntityStore, InMemoryRunHistory,
};
use delivery_dispatch::adapters::outbound::{init_combined_logger, init_console_logger};
use delivery_dispatch::application::{AssignmentService, OrderService, PartnerService};
use delivery_dispatch::domains::assignment::DynRunHistory;
use delivery_dispatch::domains::delivery::{DynEntityStore, EntityStore};
use delivery_dispatch::DispatchConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Delivery Dispatch");

    let config = match DispatchConfig::from_file("config.toml").await {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not load config.toml ({}), using defaults", e);
            DispatchConfig::default()
        }
    };

    let logger = match &config.logging.file {
        Some(path) => init_combined_logger(path),
        None => init_console_logger(),
    };

    let store: DynEntityStore = match &config.store.seed_file {
        Some(path) => {
            let file_store = FileEntityStore::open(path)
                .await
                .map_err(anyhow::Error::msg)?;
            if file_store.partners().await.map_err(anyhow::Error::msg)?.is_empty() {
                info!("Seeding {} with demo data", path);
                file_store
                    .seed(
                        fixtures::demo_orders(12, Utc::now()),
                        fixtures::demo_partners(5, config.engine.default_capacity),
                    )
                    .await
                    .map_err(anyhow::Error::msg)?;
            }
            Arc::new(file_store)
        }
        None => {
            let memory_store = InMemoryEntityStore::new();
            memory_store
                .load(
                    fixtures::demo_orders(12, Utc::now()),
                    fixtures::demo_partners(5, config.engine.default_capacity),
                )
                .await;
            Arc::new(memory_store)
        }
    };

    let history: DynRunHistory = match &config.history.dir {
        Some(dir) => Arc::new(FileRunHistory::new(dir)),
        None => Arc::new(InMemoryRunHistory::new()),
    };

    let assignments = AssignmentService::new(store.clone(), history, logger.clone(), &config.engine);
    let orders = OrderService::new(store.clone(), logger.clone());
    let partners = PartnerService::new(store.clone(), logger, config.engine.default_capacity);

    let order_summary = orders.summary().await?;
    let partner_summary = partners.status_summary().await?;
    info!(
        "Store ready: {} orders ({} pending), partners available/busy/offline {}/{}/{}",
        order_summary.total,
        order_summary.pending,
        partner_summary.available,
        partner_summary.busy,
        partner_summary.offline
    );

    // The dashboard's manual "Run Assignment" action and its periodic
    // refresh call the same idempotent operation; here the interval stands
    // in for both.
    let mut ticker = tokio::time::interval(Duration::from_secs(config.engine.run_interval_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match assignments.run_assignment().await {
                    Ok(metrics) => info!(
                        "Assignment run: {} assigned, success rate {:.1}%",
                        metrics.total_assigned, metrics.success_rate
                    ),
                    Err(e) => error!("Assignment run failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down Delivery Dispatch");
                break;
            }
        }
    }

    Ok(())
}
