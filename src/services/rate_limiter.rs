//! In-memory sliding-window rate limiter keyed by client IP.
//!
//! Each key keeps the instants of its accepted calls inside the window. Keys
//! whose newest accepted call has left the window are swept at most once per
//! window, so memory stays bounded by the keys active in the last window.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::{Duration, Instant},
};

pub const VISIT_LIMIT: usize = 10;
pub const VISIT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct SlidingWindowLimiter {
    limit: usize,
    window: Duration,
    state: Mutex<LimiterState>,
}

#[derive(Debug, Default)]
struct LimiterState {
    hits: HashMap<String, VecDeque<Instant>>,
    last_sweep: Option<Instant>,
}

impl SlidingWindowLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Mutex::new(LimiterState::default()),
        }
    }

    /// Limiter used for visit tracking: 10 calls per rolling minute.
    pub fn for_visits() -> Self {
        Self::new(VISIT_LIMIT, VISIT_WINDOW)
    }

    /// Record a call for `key` now. Returns false when the call is rejected.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// Record a call for `key` at `now`. Rejected calls are not recorded.
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.sweep_if_due(now, self.window);

        let hits = state.hits.entry(key.to_string()).or_default();
        while let Some(&oldest) = hits.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                hits.pop_front();
            } else {
                break;
            }
        }

        if hits.len() >= self.limit {
            return false;
        }
        hits.push_back(now);
        true
    }

    /// Number of keys currently held in memory.
    #[cfg(test)]
    pub fn tracked_keys(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).hits.len()
    }
}

impl LimiterState {
    fn sweep_if_due(&mut self, now: Instant, window: Duration) {
        let due = match self.last_sweep {
            Some(last) => now.saturating_duration_since(last) >= window,
            None => true,
        };
        if !due {
            return;
        }
        self.last_sweep = Some(now);
        let before = self.hits.len();
        self.hits.retain(|_, hits| {
            hits.back()
                .is_some_and(|&newest| now.saturating_duration_since(newest) < window)
        });
        let evicted = before - self.hits.len();
        if evicted > 0 {
            tracing::debug!(evicted, "swept idle rate-limit entries");
        }
    }
}
