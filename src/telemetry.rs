//! Telemetry metric name constants.
//!
//! Centralised metric names for rotomdex operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `rotomdex_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `endpoint` — remote endpoint invoked (e.g. "pokemon list", "type listing")
//! - `operation` — retried operation name
//! - `cache` — which cache was consulted (e.g. "detail")
//! - `status` — outcome: "ok" or "error"

/// Total requests dispatched to the remote API.
///
/// Labels: `endpoint`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "rotomdex_requests_total";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `operation`.
pub const RETRIES_TOTAL: &str = "rotomdex_retries_total";

/// Total cache hits.
///
/// Labels: `cache`.
pub const CACHE_HITS_TOTAL: &str = "rotomdex_cache_hits_total";

/// Total cache misses.
///
/// Labels: `cache`.
pub const CACHE_MISSES_TOTAL: &str = "rotomdex_cache_misses_total";
