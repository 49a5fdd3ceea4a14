//! Per-group observability counters.
//!
//! Counters are plain atomics rather than a mutex-guarded struct: recording a
//! hit or miss must never contend with the cache mutex it sits beside. The
//! deterministic-ordering rationale behind this crate's sibling cache
//! implementations (`BTreeMap`-keyed metric dumps) is preserved here in
//! [`GroupMetricsSnapshot`]'s field order, which callers may rely on when
//! formatting output.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    gets: AtomicU64,
    local_hits: AtomicU64,
    local_misses: AtomicU64,
    loader_calls: AtomicU64,
    loader_errors: AtomicU64,
    peer_hits: AtomicU64,
    peer_errors: AtomicU64,
    evictions: AtomicU64,
}

/// Shared, cheaply-cloneable counter bundle for one [`crate::group::Group`].
///
/// Clones share the same underlying counters (via `Arc`), so a clone handed
/// to an eviction callback still updates the counters the `Group` reads.
#[derive(Debug, Default, Clone)]
pub struct GroupMetrics {
    counters: Arc<Counters>,
}

impl GroupMetrics {
    /// Records that `Group::get` was called.
    pub fn record_get(&self) {
        self.counters.gets.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a local cache hit.
    pub fn record_local_hit(&self) {
        self.counters.local_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a local cache miss.
    pub fn record_local_miss(&self) {
        self.counters.local_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an invocation of the user-supplied loader.
    pub fn record_loader_call(&self) {
        self.counters.loader_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a loader failure.
    pub fn record_loader_error(&self) {
        self.counters.loader_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a successful remote peer round trip.
    pub fn record_peer_hit(&self) {
        self.counters.peer_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed remote peer round trip.
    pub fn record_peer_error(&self) {
        self.counters.peer_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one entry evicted from the local cache.
    pub fn record_eviction(&self) {
        self.counters.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> GroupMetricsSnapshot {
        GroupMetricsSnapshot {
            gets: self.counters.gets.load(Ordering::Relaxed),
            local_hits: self.counters.local_hits.load(Ordering::Relaxed),
            local_misses: self.counters.local_misses.load(Ordering::Relaxed),
            loader_calls: self.counters.loader_calls.load(Ordering::Relaxed),
            loader_errors: self.counters.loader_errors.load(Ordering::Relaxed),
            peer_hits: self.counters.peer_hits.load(Ordering::Relaxed),
            peer_errors: self.counters.peer_errors.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Plain-data snapshot of [`GroupMetrics`] at a point in time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GroupMetricsSnapshot {
    /// Total calls to `Group::get`.
    pub gets: u64,
    /// Local cache hits.
    pub local_hits: u64,
    /// Local cache misses.
    pub local_misses: u64,
    /// Loader invocations.
    pub loader_calls: u64,
    /// Loader failures.
    pub loader_errors: u64,
    /// Successful remote peer fetches.
    pub peer_hits: u64,
    /// Failed remote peer fetches.
    pub peer_errors: u64,
    /// Entries evicted from the local cache.
    pub evictions: u64,
}

impl GroupMetricsSnapshot {
    /// Fraction of `gets` served from the local cache, or 0.0 with no gets.
    #[must_use]
    pub fn local_hit_rate(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.local_hits as f64 / self.gets as f64
        }
    }
}
