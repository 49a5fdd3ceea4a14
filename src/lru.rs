//! Byte-budgeted Least Recently Used cache.
//!
//! Combines a hashmap keyed lookup with the arena-based recency list in
//! [`crate::list`] to give O(1) `get`/`insert`, evicting from the
//! least-recently-used end whenever the running byte total exceeds the
//! configured budget.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

use crate::list::List;

/// Something that can report its own size in bytes for budget accounting.
pub trait ByteSized {
    /// Size of this value, in bytes, as counted against the cache's budget.
    fn byte_size(&self) -> u64;
}

impl ByteSized for Vec<u8> {
    fn byte_size(&self) -> u64 {
        self.len() as u64
    }
}

impl ByteSized for crate::byteview::ByteView {
    fn byte_size(&self) -> u64 {
        self.len() as u64
    }
}

impl ByteSized for String {
    fn byte_size(&self) -> u64 {
        self.len() as u64
    }
}

struct Node<K, V> {
    key: K,
    value: V,
}

/// A byte-budgeted LRU cache.
///
/// `max_bytes == 0` disables eviction; the cache then grows without bound.
/// Otherwise, after every `insert`, entries are evicted from the
/// least-recently-used end until `used_bytes <= max_bytes` or only one entry
/// remains — a single entry whose own size exceeds `max_bytes` is tolerated
/// rather than evicted against itself.
pub struct Lru<K, V>
where
    K: Eq + Hash + Clone + ByteSized,
    V: ByteSized,
{
    max_bytes: u64,
    used_bytes: u64,
    list: List<Node<K, V>>,
    index: HashMap<K, usize>,
    on_evicted: Option<Box<dyn FnMut(&K, &V) + Send>>,
}

impl<K, V> fmt::Debug for Lru<K, V>
where
    K: Eq + Hash + Clone + ByteSized + fmt::Debug,
    V: ByteSized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lru")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.index.len())
            .finish()
    }
}

impl<K, V> Lru<K, V>
where
    K: Eq + Hash + Clone + ByteSized,
    V: ByteSized,
{
    /// Builds a new cache with the given byte budget and no eviction
    /// callback. Pass `0` for an unbounded cache.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            list: List::new(),
            index: HashMap::new(),
            on_evicted: None,
        }
    }

    /// Installs a callback invoked exactly once per evicted entry, with the
    /// key and value that were removed.
    pub fn with_on_evicted<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(callback));
        self
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total bytes currently accounted for.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Looks up `key`. A hit promotes the entry to most-recently-used; a
    /// miss leaves recency order untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.list.move_to_front(idx);
        Some(&self.list.get(idx).value)
    }

    /// Inserts `value` under `key`, replacing any existing entry and
    /// promoting it to most-recently-used, then evicts from the
    /// least-recently-used end until the budget is satisfied.
    pub fn insert(&mut self, key: K, value: V) {
        let new_size = key.byte_size() + value.byte_size();
        if let Some(&idx) = self.index.get(&key) {
            let old_size = {
                let node = self.list.get(idx);
                node.key.byte_size() + node.value.byte_size()
            };
            self.list.get_mut(idx).value = value;
            self.list.move_to_front(idx);
            self.used_bytes = self.used_bytes - old_size + new_size;
        } else {
            let idx = self.list.push_front(Node { key: key.clone(), value });
            self.index.insert(key, idx);
            self.used_bytes += new_size;
        }
        self.evict_to_budget();
    }

    /// Removes `key`, returning its value if present. Does not invoke the
    /// eviction callback — this is an explicit removal, not a budget-driven
    /// eviction.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let idx = self.index.remove(key)?;
        let node = self.list.remove(idx);
        self.used_bytes -= node.key.byte_size() + node.value.byte_size();
        Some(node.value)
    }

    fn evict_to_budget(&mut self) {
        if self.max_bytes == 0 {
            return;
        }
        while self.used_bytes > self.max_bytes && self.index.len() > 1 {
            self.evict_one();
        }
    }

    fn evict_one(&mut self) {
        let Some(idx) = self.list.back_index() else {
            return;
        };
        let node = self.list.remove(idx);
        self.index.remove(&node.key);
        self.used_bytes -= node.key.byte_size() + node.value.byte_size();
        if let Some(cb) = self.on_evicted.as_mut() {
            cb(&node.key, &node.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str_size(s: &str) -> u64 {
        s.len() as u64
    }

    #[test]
    fn eviction_by_bytes_keeps_newest_two() {
        // budget == len("key1"+"value1"+"key2"+"value2")
        let max_bytes = str_size("key1") + str_size("value1") + str_size("key2") + str_size("value2");
        let mut cache: Lru<String, String> = Lru::new(max_bytes);
        cache.insert("key1".to_string(), "value1".to_string());
        cache.insert("key2".to_string(), "value2".to_string());
        cache.insert("k3".to_string(), "v3".to_string());

        assert!(cache.get("key1").is_none());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("k3").map(String::as_str), Some("v3"));
    }

    #[test]
    fn eviction_callback_fires_in_order() {
        use std::sync::{Arc, Mutex};

        let evicted: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let evicted_cb = evicted.clone();
        let mut cache: Lru<String, String> = Lru::new(10).with_on_evicted(move |k, _v| {
            evicted_cb.lock().unwrap().push(k.clone());
        });

        cache.insert("key1".to_string(), "123456".to_string());
        cache.insert("k2".to_string(), "v2".to_string());
        cache.insert("k3".to_string(), "v3".to_string());
        cache.insert("k4".to_string(), "v4".to_string());

        assert_eq!(*evicted.lock().unwrap(), vec!["key1".to_string(), "k2".to_string()]);
    }

    #[test]
    fn get_promotes_to_most_recently_used() {
        let mut cache: Lru<String, String> = Lru::new(100);
        cache.insert("a".to_string(), "1".to_string());
        cache.insert("b".to_string(), "2".to_string());
        cache.insert("c".to_string(), "3".to_string());
        // touch "a" so it is no longer the least-recently-used
        assert!(cache.get("a").is_some());

        // shrink the budget so the next insert forces exactly one eviction
        cache.max_bytes = str_size("a1") + str_size("c3") + str_size("d4") + 1;
        cache.insert("d".to_string(), "4".to_string());

        // "b" was least-recently-used after the touch, so it is evicted, not "a"
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
    }

    #[test]
    fn updating_identical_size_value_still_promotes() {
        let mut cache: Lru<String, String> = Lru::new(0);
        cache.insert("a".to_string(), "1".to_string());
        cache.insert("b".to_string(), "2".to_string());
        cache.insert("a".to_string(), "9".to_string());
        assert_eq!(cache.get("a").map(String::as_str), Some("9"));
    }

    #[test]
    fn zero_max_bytes_disables_eviction() {
        let mut cache: Lru<String, String> = Lru::new(0);
        for i in 0..1000 {
            cache.insert(format!("k{i}"), "v".to_string());
        }
        assert_eq!(cache.len(), 1000);
    }

    #[test]
    fn oversized_single_entry_survives() {
        let mut cache: Lru<String, String> = Lru::new(4);
        cache.insert("k".to_string(), "much-too-large-for-the-budget".to_string());
        assert_eq!(cache.len(), 1);
        assert!(cache.used_bytes() > 4);
        assert!(cache.get("k").is_some());
    }

    #[test]
    fn remove_does_not_invoke_eviction_callback() {
        use std::sync::{Arc, Mutex};

        let evicted: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let evicted_cb = evicted.clone();
        let mut cache: Lru<String, String> = Lru::new(0).with_on_evicted(move |k, _v| {
            evicted_cb.lock().unwrap().push(k.clone());
        });
        cache.insert("a".to_string(), "1".to_string());
        cache.remove("a");
        assert!(evicted.lock().unwrap().is_empty());
    }
}
