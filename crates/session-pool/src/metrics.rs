//! Pool metrics
//!
//! - `session_pool_cache_hits_total` (counter)
//! - `session_pool_sessions_created_total` (counter): label `backend`
//! - `session_pool_evictions_total` (counter): label `reason`
//! - `session_pool_failures_total` (counter): label `classification`
//!
//! Without an installed recorder these calls are no-ops.

use session::Backend;

use crate::failure::Classification;

pub fn record_cache_hit() {
    metrics::counter!("session_pool_cache_hits_total").increment(1);
}

pub fn record_session_created(backend: Backend) {
    metrics::counter!("session_pool_sessions_created_total", "backend" => backend.label())
        .increment(1);
}

/// `reason` is `expired` (found stale on acquire) or `refresh`.
pub fn record_eviction(reason: &'static str) {
    metrics::counter!("session_pool_evictions_total", "reason" => reason).increment(1);
}

pub fn record_failure(classification: Classification) {
    metrics::counter!(
        "session_pool_failures_total",
        "classification" => classification.label()
    )
    .increment(1);
}
