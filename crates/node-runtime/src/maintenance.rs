//! Periodic maintenance task.
//!
//! The in-memory OTP and rate-limit stores emulate storage-level TTL: reads
//! already ignore expired records, and this sweep reclaims them. Each pass
//! also replays the stock ledger and reports any account whose cached
//! balance drifted from its entries.

use std::sync::Arc;
use std::time::Duration;

use steel_telemetry::log_event;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::container::{MaintenanceReport, SubsystemContainer};

/// Run one pass and log what it found.
pub fn run_once(container: &SubsystemContainer) -> MaintenanceReport {
    let report = container.run_maintenance();
    let purged = report.purged.otp_records + report.purged.rate_records;
    if purged > 0 {
        log_event!(
            debug,
            "node-runtime",
            "Expired records purged",
            otp_records = report.purged.otp_records,
            rate_records = report.purged.rate_records
        );
    }
    if !report.integrity.is_consistent() {
        log_event!(
            error,
            "node-runtime",
            "Ledger integrity check failed",
            entries = report.integrity.entries,
            mismatched = report.integrity.mismatched.len()
        );
    }
    report
}

/// Spawn the maintenance loop. It stops when `shutdown` flips to `true`.
pub fn spawn(
    container: Arc<SubsystemContainer>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    run_once(&container);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        log_event!(info, "node-runtime", "Maintenance task stopped");
                        break;
                    }
                }
            }
        }
    })
}
