//! Prometheus metrics for Steel-Chain subsystems.
//!
//! All metrics follow the naming convention: `sc_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // OTP AUTH METRICS (Subsystem 2)
    // =========================================================================

    /// Codes issued, by SMS delivery status
    pub static ref OTP_CODES_SENT: CounterVec = CounterVec::new(
        Opts::new("sc_otp_codes_sent_total", "OTP codes issued"),
        &["sms_status"]  // sent / pending
    ).expect("metric creation failed");

    /// Verification attempts by outcome
    pub static ref OTP_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("sc_otp_verifications_total", "OTP verification attempts"),
        &["outcome"]  // success or an error kind
    ).expect("metric creation failed");

    // =========================================================================
    // STOCK LEDGER METRICS (Subsystem 3)
    // =========================================================================

    /// Kilograms moved, by movement type
    pub static ref STOCK_KG: CounterVec = CounterVec::new(
        Opts::new("sc_stock_moved_kg_total", "Steel moved through the ledger in kg"),
        &["movement"]  // dispatched / received / sold / purchased
    ).expect("metric creation failed");

    // =========================================================================
    // REWARD METRICS (Subsystem 4)
    // =========================================================================

    /// Successful reward claims
    pub static ref REWARDS_CLAIMED: Counter = Counter::new(
        "sc_rewards_claimed_total",
        "Number of reward claims paid"
    ).expect("metric creation failed");

    /// Reward kilograms paid out
    pub static ref REWARD_KG: Counter = Counter::new(
        "sc_rewards_paid_kg_total",
        "Reward kilograms credited"
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// API errors by error kind
    pub static ref API_ERRORS: CounterVec = CounterVec::new(
        Opts::new("sc_api_errors_total", "API errors by kind"),
        &["kind"]
    ).expect("metric creation failed");
}

/// Stock movement label values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMovement {
    Dispatched,
    Received,
    Sold,
    Purchased,
}

impl StockMovement {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dispatched => "dispatched",
            Self::Received => "received",
            Self::Sold => "sold",
            Self::Purchased => "purchased",
        }
    }
}

/// Handle proving the metrics were registered.
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    _registry: Registry,
}

/// Register all metrics with the global registry. Safe to call twice.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(OTP_CODES_SENT.clone()),
        Box::new(OTP_VERIFICATIONS.clone()),
        Box::new(STOCK_KG.clone()),
        Box::new(REWARDS_CLAIMED.clone()),
        Box::new(REWARD_KG.clone()),
        Box::new(API_ERRORS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: REGISTRY.clone(),
    })
}

pub fn record_otp_sent(sms_status: &str) {
    OTP_CODES_SENT.with_label_values(&[sms_status]).inc();
}

pub fn record_otp_verification(outcome: &str) {
    OTP_VERIFICATIONS.with_label_values(&[outcome]).inc();
}

pub fn record_stock(movement: StockMovement, kg: f64) {
    STOCK_KG.with_label_values(&[movement.label()]).inc_by(kg);
}

pub fn record_reward_claim(kg: f64) {
    REWARDS_CLAIMED.inc();
    REWARD_KG.inc_by(kg);
}

pub fn record_api_error(kind: &str) {
    API_ERRORS.with_label_values(&[kind]).inc();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
