//! Fixed-window request counters keyed by caller address.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;

use crate::error::AppError;

const PRUNE_THRESHOLD: usize = 10_000;

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    pub max: u32,
    pub window: Duration,
    pub message: &'static str,
    /// Include the ceiling in the 429 body.
    pub report_limit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed {
        limit: u32,
        remaining: u32,
        reset_in: Duration,
    },
    Rejected {
        reset_in: Duration,
    },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

pub struct FixedWindowLimiter {
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
    windows: DashMap<IpAddr, Window>,
}

impl FixedWindowLimiter {
    pub fn new(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            windows: DashMap::new(),
        }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Counts one request for `key`. A caller's window opens on its first
    /// request and resets once `window` has elapsed.
    pub fn check(&self, key: IpAddr) -> Admission {
        let now = self.clock.now();
        let window = self.policy.window;

        if self.windows.len() > PRUNE_THRESHOLD {
            self.windows
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
        }

        let mut entry = self.windows.entry(key).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(entry.started) >= window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        let reset_in = window.saturating_sub(now.saturating_duration_since(entry.started));
        if entry.count >= self.policy.max {
            return Admission::Rejected { reset_in };
        }

        entry.count += 1;
        Admission::Allowed {
            limit: self.policy.max,
            remaining: self.policy.max - entry.count,
            reset_in,
        }
    }
}

/// Middleware state: one limiter plus how to find the caller behind proxies.
#[derive(Clone)]
pub struct LimiterState {
    pub limiter: Arc<FixedWindowLimiter>,
    pub trust_proxy_hops: usize,
}

pub async fn enforce(State(state): State<LimiterState>, request: Request, next: Next) -> Response {
    let caller = caller_identity(&request, state.trust_proxy_hops);

    match state.limiter.check(caller) {
        Admission::Allowed {
            limit,
            remaining,
            reset_in,
        } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            for (name, value) in [
                ("ratelimit-limit", limit.to_string()),
                ("ratelimit-remaining", remaining.to_string()),
                ("ratelimit-reset", reset_in.as_secs().to_string()),
            ] {
                if !headers.contains_key(name) {
                    if let Ok(value) = HeaderValue::from_str(&value) {
                        headers.insert(name, value);
                    }
                }
            }
            response
        }
        Admission::Rejected { reset_in } => {
            let policy = state.limiter.policy();
            tracing::warn!(%caller, limit = policy.max, "rate limit exceeded");
            AppError::RateLimited {
                message: policy.message,
                window: policy.window,
                reset_in,
                limit: policy.report_limit.then_some(policy.max),
            }
            .into_response()
        }
    }
}

/// The peer address, or with `trust_proxy_hops = n` the n-th address from the
/// right of `X-Forwarded-For` + peer.
pub fn caller_identity<B>(request: &axum::http::Request<B>, trust_proxy_hops: usize) -> IpAddr {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|c| c.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    if trust_proxy_hops == 0 {
        return peer;
    }

    let mut chain: Vec<IpAddr> = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .map(|xff| {
            xff.split(',')
                .filter_map(|part| part.trim().parse::<IpAddr>().ok())
                .collect()
        })
        .unwrap_or_default();
    chain.push(peer);

    chain[chain.len().saturating_sub(1 + trust_proxy_hops)]
}
