use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qosmon_core::profile::ProfileRegistry;
use qosmon_db::ConnectionManager;
use qosmon_events::EventBus;
use qosmon_monitor::{MonitorConfig, QosMonitor, ViolationLogger};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qosmon_monitor=debug,qosmon_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = match MonitorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(
        default_sample_window = config.default_sample_window,
        synchronous_commit = %config.db.synchronous_commit,
        "Loaded monitor configuration",
    );

    // --- Database ---
    let manager = Arc::new(ConnectionManager::new());
    if let Err(e) = manager.start(&config.db).await {
        tracing::error!(error = %e, "Failed to connect to database");
        std::process::exit(1);
    }

    if let Err(e) = manager.health_check().await {
        tracing::error!(error = %e, "Database health check failed");
        std::process::exit(1);
    }
    tracing::info!("Database health check passed");

    if let Err(e) = manager.run_migrations().await {
        tracing::error!(error = %e, "Failed to run database migrations");
        std::process::exit(1);
    }
    tracing::info!("Database migrations applied");

    // --- Profiles ---
    let registry = Arc::new(ProfileRegistry::with_defaults());
    tracing::info!(profiles = ?registry.profile_types(), "QoS profiles registered");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::new(config.event_capacity));
    let logger_handle = tokio::spawn(ViolationLogger::run(event_bus.subscribe()));

    // --- Monitor ---
    let monitor = QosMonitor::new(
        Arc::clone(&manager),
        Arc::clone(&registry),
        Arc::clone(&event_bus),
    )
    .with_default_sample_window(config.default_sample_window);

    match monitor.list_rules().await {
        Ok(rules) => tracing::info!(rules = rules.len(), "QoS monitor ready"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load rules");
            std::process::exit(1);
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");

    // Dropping the last bus handle closes the channel and stops the logger.
    drop(monitor);
    drop(event_bus);
    if ViolationLogger::drain(logger_handle, Duration::from_secs(5)).await {
        tracing::info!("Violation logger stopped");
    }

    manager.stop().await;
    tracing::info!("Shutdown complete");
}
