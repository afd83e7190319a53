//! quietsend — quiet-hours aware notification delivery daemon.
//!
//! Wires the in-memory window store, a logging transport, and the delivery
//! scheduler, then sweeps held notifications until shutdown.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use quietsend_core::config::AppConfig;
use quietsend_core::types::NotificationPayload;
use quietsend_delivery::queue::NotificationQueue;
use quietsend_delivery::scheduler::DeliveryScheduler;
use quietsend_delivery::transport::LoggingTransport;
use quietsend_windows::InMemoryWindowStore;

#[derive(Parser, Debug)]
#[command(name = "quietsend")]
#[command(about = "Quiet-hours aware notification delivery daemon")]
#[command(version)]
struct Cli {
    /// Seconds between scheduler sweep passes (overrides config)
    #[arg(long, env = "QUIETSEND__SCHEDULER__SWEEP_INTERVAL_SECS")]
    sweep_interval_secs: Option<u64>,

    /// Failed delivery attempts before an item is dropped, 0 = unlimited
    /// (overrides config)
    #[arg(long, env = "QUIETSEND__QUEUE__MAX_DELIVERY_ATTEMPTS")]
    max_attempts: Option<u32>,

    /// Seed demo quiet windows and submit a demo notification per subject
    #[arg(long, default_value_t = false)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quietsend=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("quietsend starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(secs) = cli.sweep_interval_secs {
        config.scheduler.sweep_interval_secs = secs;
    }
    if let Some(max) = cli.max_attempts {
        config.queue.max_delivery_attempts = max;
    }

    info!(
        node_id = %config.node_id,
        sweep_interval_secs = config.scheduler.sweep_interval_secs,
        max_delivery_attempts = config.queue.max_delivery_attempts,
        "Configuration loaded"
    );

    let store = Arc::new(InMemoryWindowStore::new());
    let queue = Arc::new(NotificationQueue::new(
        Arc::new(LoggingTransport),
        config.queue.max_delivery_attempts,
    ));
    let scheduler = Arc::new(DeliveryScheduler::new(
        queue,
        store.clone(),
        Duration::from_secs(config.scheduler.sweep_interval_secs),
    ));

    if cli.seed_demo {
        for subject_id in store.seed_demo_data()? {
            let outcome = scheduler.submit(NotificationPayload {
                subject_id,
                message: "demo notification".to_string(),
                opaque_data: None,
                occurs_at: chrono::Utc::now(),
                relevance_expires_at: Some(chrono::Utc::now() + chrono::Duration::hours(12)),
            })?;
            info!(subject_id = %subject_id, ?outcome, "demo notification submitted");
        }
    }

    // Spawn the sweep loop
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let scheduler_task = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move { scheduler.run(shutdown_rx).await })
    };

    info!("quietsend is ready");

    // Drain held notifications on the way out
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, draining");
    shutdown_tx.send(true).ok();
    scheduler_task.await?;

    Ok(())
}
