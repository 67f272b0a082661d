//! Per-client rate limiting with fixed-window counters.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde_json::json;

use crate::config::RateLimitTier;
use crate::observability::metrics;
use crate::security::client_addr::resolve_client_addr;

struct Window {
    count: u32,
    started: Instant,
}

/// In-memory fixed-window rate limiter keyed by client identity.
///
/// Counters live in a concurrent map; each check is an atomic
/// read-modify-write under the entry's shard lock, so parallel arrivals
/// from one client cannot undercount while distinct clients never
/// contend on each other.
///
/// State is process-local by design: the service runs as a single
/// instance, so no shared counter store is needed.
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    windows: DashMap<String, Window>,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: DashMap::new(),
        }
    }

    /// Record one request for `key`. Returns `true` to admit.
    ///
    /// A fresh or expired window resets to a count of one and admits;
    /// otherwise the request is admitted while the count stays within
    /// the budget.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();

        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| Window { count: 0, started: now });
        let window = entry.value_mut();

        if now.duration_since(window.started) >= self.window {
            window.count = 1;
            window.started = now;
            true
        } else if window.count < self.max_requests {
            window.count += 1;
            true
        } else {
            false
        }
    }

    /// Drop entries whose window has expired.
    ///
    /// Purely an allocation bound; admission decisions never depend on
    /// the sweep having run.
    pub fn sweep(&self) {
        let window = self.window;
        self.windows.retain(|_, w| w.started.elapsed() < window);
    }

    /// Number of client identities currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

/// One rate-limited route group: a shared limiter plus the request
/// context needed to key it.
#[derive(Clone)]
pub struct RateLimitGate {
    limiter: Arc<FixedWindowLimiter>,
    scope: &'static str,
    trust_proxy: bool,
    enabled: bool,
}

impl RateLimitGate {
    pub fn new(tier: &RateLimitTier, scope: &'static str, trust_proxy: bool) -> Self {
        Self {
            limiter: Arc::new(FixedWindowLimiter::new(
                tier.max_requests,
                Duration::from_secs(tier.window_secs),
            )),
            scope,
            trust_proxy,
            enabled: tier.enabled,
        }
    }

    /// Handle to the underlying limiter, for background sweeping.
    pub fn limiter(&self) -> Arc<FixedWindowLimiter> {
        self.limiter.clone()
    }
}

/// Middleware rejecting requests over the client's window budget.
///
/// Runs before the handler, so a rejected request performs no store
/// mutation and triggers no notification.
pub async fn rate_limit_middleware(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(gate): State<RateLimitGate>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !gate.enabled {
        return next.run(request).await;
    }

    let client = resolve_client_addr(peer, request.headers(), gate.trust_proxy);

    if gate.limiter.check(&client) {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, scope = gate.scope, "Rate limit exceeded");
        metrics::record_rate_limited(gate.scope);
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many requests, please try again later" })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_exhaustion() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        assert!(limiter.check("5.6.7.8"));
    }

    #[test]
    fn test_window_expiry_resets_count() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_millis(40));

        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));

        std::thread::sleep(Duration::from_millis(50));

        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
    }

    #[test]
    fn test_sweep_drops_expired_entries_only() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_millis(40));

        limiter.check("old");
        std::thread::sleep(Duration::from_millis(50));
        limiter.check("fresh");

        assert_eq!(limiter.tracked_clients(), 2);
        limiter.sweep();
        assert_eq!(limiter.tracked_clients(), 1);

        // The surviving client keeps its window.
        assert!(limiter.check("fresh"));
    }

    #[test]
    fn test_concurrent_checks_never_exceed_budget() {
        let limiter = Arc::new(FixedWindowLimiter::new(10, Duration::from_secs(60)));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    let mut admitted = 0;
                    for _ in 0..10 {
                        if limiter.check("1.2.3.4") {
                            admitted += 1;
                        }
                    }
                    admitted
                })
            })
            .collect();

        let admitted: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 10);
    }
}
