//! Structured logging conventions.
//!
//! Every event carries a `subsystem` field so log pipelines can split the
//! stream per component: `identity`, `otp-auth`, `stock-ledger`, `rewards`,
//! `api-gateway`, `node-runtime`.

/// Emits a tracing event tagged with a subsystem.
///
/// ```rust,ignore
/// log_event!(info, "stock-ledger", "Stock received", dealer = %dealer_id);
/// ```
#[macro_export]
macro_rules! log_event {
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}
