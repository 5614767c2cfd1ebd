// Usage metrics module
//
// Provides lightweight counters for API traffic and UI event delivery

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Session-wide usage metrics
///
/// Uses atomic operations for thread-safe tracking without locks. Counters are shared
/// between the controller and its spawned requests and logged on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Questions received from the API (random, deck or browser)
    pub questions_loaded: AtomicU64,

    /// Answer checks sent
    pub checks_sent: AtomicU64,

    /// Answer checks that failed (network, status or decode errors)
    pub checks_failed: AtomicU64,

    /// Server-side translations requested
    pub translations_requested: AtomicU64,

    /// Requests refused with 429 Too Many Requests
    pub rate_limited: AtomicU64,

    /// Responses discarded because a newer request superseded them
    pub stale_responses_dropped: AtomicU64,

    /// Toasts dropped because the toast channel was full
    pub toasts_dropped: AtomicU64,

    /// Total time spent waiting for the API in milliseconds
    pub api_time_ms: AtomicU64,

    /// Number of API requests completed (successfully or not)
    pub api_requests: AtomicU64,

    /// Application start time
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            questions_loaded: AtomicU64::new(0),
            checks_sent: AtomicU64::new(0),
            checks_failed: AtomicU64::new(0),
            translations_requested: AtomicU64::new(0),
            rate_limited: AtomicU64::new(0),
            stale_responses_dropped: AtomicU64::new(0),
            toasts_dropped: AtomicU64::new(0),
            api_time_ms: AtomicU64::new(0),
            api_requests: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_questions_loaded(&self, count: usize) {
        self.questions_loaded
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_check_sent(&self) {
        self.checks_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_check_failed(&self) {
        self.checks_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translation(&self) {
        self.translations_requested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_response(&self) {
        self.stale_responses_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_toast_dropped(&self) {
        self.toasts_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how long one API request took
    pub fn record_api_time(&self, duration: Duration) {
        self.api_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
        self.api_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average API latency in milliseconds
    pub fn avg_api_time_ms(&self) -> f64 {
        let total = self.api_time_ms.load(Ordering::Relaxed);
        let count = self.api_requests.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Questions loaded: {}, checks: {} sent / {} failed, translations: {}",
            self.questions_loaded.load(Ordering::Relaxed),
            self.checks_sent.load(Ordering::Relaxed),
            self.checks_failed.load(Ordering::Relaxed),
            self.translations_requested.load(Ordering::Relaxed)
        );
        tracing::info!(
            "API requests: {} (avg: {:.2}ms), rate limited: {}",
            self.api_requests.load(Ordering::Relaxed),
            self.avg_api_time_ms(),
            self.rate_limited.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Stale responses dropped: {}, toasts dropped: {}",
            self.stale_responses_dropped.load(Ordering::Relaxed),
            self.toasts_dropped.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
