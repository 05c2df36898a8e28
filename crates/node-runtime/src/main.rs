//! # Steel-Chain Node Runtime
//!
//! The main entry point for the Steel-Chain supply-chain node.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and the subsystem container
//! - `adapters/` - Port implementations connecting subsystems
//! - `maintenance` - TTL purge and ledger audit loop
//! - `metrics` - Prometheus scrape listener
//!
//! ## Request Flow
//!
//! ```text
//!   client ──HTTP──→ API Gateway(5) ── bearer token ──→ OTP Auth(2)
//!                          │                                │
//!                          │                        live identity lookup
//!                          ↓                                ↓
//!                    authorize(principal, action) ←── Identity(1)
//!                          │
//!          ┌───────────────┴───────────────┐
//!          ↓                               ↓
//!   Stock Ledger(3) ←── sale totals ── Rewards(4)
//!          ↑                               │
//!          └──────── reward credit ────────┘
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs + metrics)
//! 2. Load configuration from the environment
//! 3. Validate the token secret is not default (enforced when `SC_ENV=production`)
//! 4. Initialize subsystems in dependency order (Level 0 → Level 3)
//! 5. Seed the super admin
//! 6. Start the maintenance task and the metrics listener
//! 7. Serve HTTP until Ctrl+C

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{error, info, warn};

use node_runtime::container::{NodeConfig, SubsystemContainer};
use node_runtime::{maintenance, metrics};
use steel_telemetry::{init_telemetry, TelemetryConfig};

/// The main node runtime orchestrating all subsystems.
pub struct NodeRuntime {
    /// Subsystem container with all initialized services.
    container: Arc<SubsystemContainer>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Create a new node runtime with configuration.
    pub fn new(config: NodeConfig) -> Self {
        info!("Creating Steel-Chain node runtime");

        let container = Arc::new(SubsystemContainer::new(config));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            container,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Run the node until shutdown is signalled.
    ///
    /// ## Startup Sequence
    ///
    /// 1. Seed the super admin
    /// 2. Spawn the maintenance task
    /// 3. Spawn the metrics listener (unless the port is 0)
    /// 4. Serve the HTTP API
    pub async fn run(&self, metrics_port: u16) -> Result<()> {
        info!("===========================================");
        info!("  Steel-Chain Node v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let admin = self
            .container
            .seed_super_admin()
            .context("Failed to seed super admin")?;
        info!(
            user_id = %admin.id,
            phone = %admin.phone_no,
            status = %admin.status,
            "Super admin ready"
        );

        let interval = self.container.config.maintenance.purge_interval();
        let maintenance = maintenance::spawn(
            Arc::clone(&self.container),
            interval,
            self.shutdown_rx.clone(),
        );
        info!("Maintenance task started (every {}s)", interval.as_secs());

        if metrics_port != 0 {
            let shutdown = self.shutdown_signal();
            tokio::spawn(async move {
                if let Err(e) = metrics::serve_metrics(metrics_port, shutdown).await {
                    error!("Metrics listener failed: {:#}", e);
                }
            });
        }

        let served = sc_05_api_gateway::serve(
            &self.container.config.server,
            self.container.app_state(),
            self.shutdown_signal(),
        )
        .await;

        // stop background tasks whichever way the server ended
        let _ = self.shutdown_tx.send(true);
        if tokio::time::timeout(Duration::from_secs(2), maintenance)
            .await
            .is_err()
        {
            warn!("Maintenance task did not stop in time");
        }

        served.context("HTTP API failed")
    }

    /// Shutdown the node gracefully.
    ///
    /// ## Shutdown Sequence
    ///
    /// 1. Signal shutdown to the server and background tasks
    /// 2. In-flight requests drain through axum's graceful shutdown
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
    }

    fn shutdown_signal(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.shutdown_rx.clone();
        async move {
            let _ = rx.wait_for(|stop| *stop).await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    let metrics_port = telemetry.metrics_port;
    let _telemetry = init_telemetry(telemetry).context("Failed to initialize telemetry")?;

    let config = NodeConfig::from_env().context("Invalid configuration")?;
    if let Err(e) = config.validate_for_production() {
        if config.production {
            return Err(e).context("Refusing to start in production");
        }
        warn!("{}", e);
    }

    let runtime = Arc::new(NodeRuntime::new(config));

    let signal_runtime = Arc::clone(&runtime);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal_runtime.shutdown(),
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    info!("Node is starting. Press Ctrl+C to stop.");
    runtime.run(metrics_port).await?;

    info!("Shutdown complete");
    Ok(())
}
