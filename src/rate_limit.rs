use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde::Serialize;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::account::AccountStore;
use crate::utils::header_utils::{extract_account_id, extract_client_ip};

/// Limiters unused for this long are dropped
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(600);

/// Idle limiters are swept once per this many checks
const SWEEP_INTERVAL: u64 = 1024;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: String,
    error: String,
}

/// Configuration for rate limiting
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per second allowed
    pub per_second: u32,
    /// Burst size (max requests in a single burst)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    // Synthesis is expensive upstream; keep the default conservative
    fn default() -> Self {
        Self {
            per_second: 2,
            burst_size: 5,
        }
    }
}

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

struct TrackedLimiter {
    limiter: DirectLimiter,
    /// Milliseconds since the owning limiter started
    last_seen_ms: AtomicU64,
}

/// Rate limiter that tracks limits per client
///
/// Clients are identified by account id when the account exists, else by address.
#[derive(Clone)]
pub struct PerClientRateLimiter {
    limiters: Arc<DashMap<String, Arc<TrackedLimiter>>>,
    quota: Quota,
    clock: DefaultClock,
    started: Instant,
    idle_ttl: Duration,
    checks: Arc<AtomicU64>,
}

impl PerClientRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let per_second = NonZeroU32::new(config.per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);

        // burst_size requests immediately, then refills at per_second
        let quota = Quota::per_second(per_second).allow_burst(burst);

        Self {
            limiters: Arc::new(DashMap::new()),
            quota,
            clock: DefaultClock::default(),
            started: Instant::now(),
            idle_ttl: DEFAULT_IDLE_TTL,
            checks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Forget clients after `ttl` without a request
    ///
    /// A limiter idle for longer than its refill time is full again, so
    /// dropping it does not loosen the limit as long as `ttl` covers that.
    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = ttl;
        self
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn get_or_create_limiter(&self, client: &str) -> Arc<TrackedLimiter> {
        self.limiters
            .entry(client.to_string())
            .or_insert_with(|| {
                Arc::new(TrackedLimiter {
                    limiter: RateLimiter::direct(self.quota),
                    last_seen_ms: AtomicU64::new(0),
                })
            })
            .clone()
    }

    /// Check if a request should be allowed for the given client
    pub fn check_rate_limit(&self, client: &str) -> Result<(), Duration> {
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            self.evict_idle();
        }

        let tracked = self.get_or_create_limiter(client);
        tracked.last_seen_ms.store(self.now_ms(), Ordering::Relaxed);

        match tracked.limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => Err(not_until.wait_time_from(self.clock.now())),
        }
    }

    /// Drop limiters idle for longer than the idle TTL; returns how many went
    pub fn evict_idle(&self) -> usize {
        let now = self.now_ms();
        let ttl = self.idle_ttl.as_millis() as u64;
        let before = self.limiters.len();

        self.limiters.retain(|_, tracked| {
            now.saturating_sub(tracked.last_seen_ms.load(Ordering::Relaxed)) < ttl
        });

        let evicted = before.saturating_sub(self.limiters.len());
        if evicted > 0 {
            tracing::debug!("Evicted {} idle rate limiters", evicted);
        }
        evicted
    }

    /// Number of clients currently holding a limiter
    pub fn tracked_clients_count(&self) -> usize {
        self.limiters.len()
    }
}

/// State for [`rate_limit_middleware`]
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: PerClientRateLimiter,
    pub accounts: Arc<AccountStore>,
}

/// Rate limit key for a request: a known account, then address, then a shared bucket
///
/// An account id the store does not know is ignored, so inventing ids does not
/// buy fresh buckets.
pub fn client_key<B>(request: &axum::http::Request<B>, accounts: &AccountStore) -> String {
    if let Some(account) = extract_account_id(request.headers()) {
        if accounts.contains(&account) {
            return format!("account:{}", account);
        }
    }
    match extract_client_ip(request) {
        Some(ip) => format!("ip:{}", ip),
        None => "anonymous".to_string(),
    }
}

/// Middleware to enforce per-client rate limiting
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request, &state.accounts);

    match state.limiter.check_rate_limit(&client) {
        Ok(_) => next.run(request).await,
        Err(wait_duration) => {
            // Round up so clients never retry early
            let retry_after = wait_duration.as_secs().max(1);

            tracing::warn!(
                "Rate limit exceeded for {} (retry after {} seconds)",
                client,
                retry_after
            );

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse {
                    status: "error".to_string(),
                    error: format!(
                        "Rate limit exceeded. Please retry after {} seconds.",
                        retry_after
                    ),
                }),
            )
                .into_response();

            response
                .headers_mut()
                .insert("Retry-After", HeaderValue::from(retry_after));

            response
        }
    }
}
