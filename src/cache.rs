//! Thread-safe, lazily-initialized wrapper around [`crate::lru::Lru`].

use parking_lot::Mutex;

use crate::byteview::ByteView;
use crate::lru::Lru;
use crate::metrics::GroupMetrics;

/// A mutex-protected `Lru<String, ByteView>`, constructed on first use.
///
/// A `get` against an uninitialized cache returns "not found" without
/// allocating the underlying `Lru` — a process that never populates a
/// namespace never pays for one.
pub struct Cache {
    max_bytes: u64,
    inner: Mutex<Option<Lru<String, ByteView>>>,
    extra_hook: Mutex<Option<Box<dyn FnMut(&str, &ByteView) + Send>>>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

impl Cache {
    /// Builds a cache with the given byte budget. The `Lru` itself is not
    /// constructed until the first `insert`.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(None),
            extra_hook: Mutex::new(None),
        }
    }

    /// Installs an additional eviction callback, invoked after metrics are
    /// recorded. Must be called before the first `insert`; later calls are
    /// silently ignored once the underlying `Lru` has already been built.
    #[must_use]
    pub fn with_on_evicted_hook<F>(self, hook: F) -> Self
    where
        F: FnMut(&str, &ByteView) + Send + 'static,
    {
        *self.extra_hook.lock() = Some(Box::new(hook));
        self
    }

    /// Looks up `key`, recording the hit or miss against `metrics`.
    pub fn get(&self, key: &str, metrics: &GroupMetrics) -> Option<ByteView> {
        let mut guard = self.inner.lock();
        let lru = guard.as_mut()?;
        let hit = lru.get(key).cloned();
        if hit.is_some() {
            metrics.record_local_hit();
        } else {
            metrics.record_local_miss();
        }
        hit
    }

    /// Inserts `value` under `key`, constructing the underlying `Lru` on
    /// first use and recording any resulting eviction against `metrics`.
    pub fn insert(&self, key: String, value: ByteView, metrics: &GroupMetrics) {
        let mut guard = self.inner.lock();
        let metrics_cb = metrics.clone();
        let mut extra = self.extra_hook.lock().take();
        let lru = guard.get_or_insert_with(|| {
            Lru::new(self.max_bytes).with_on_evicted(move |k, v| {
                metrics_cb.record_eviction();
                if let Some(hook) = extra.as_mut() {
                    hook(k, v);
                }
            })
        });
        lru.insert(key, value);
    }

    /// Number of entries currently cached, or 0 if never initialized.
    pub fn len(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, Lru::len)
    }

    /// True if the cache is empty or never initialized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
