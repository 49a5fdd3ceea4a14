//! Construction-time configuration for a [`crate::group::Group`].

use crate::byteview::ByteView;
use crate::hashring::{HashFn, DEFAULT_REPLICAS};

/// Builder-style configuration consumed by [`crate::registry::new_group`].
///
/// Mirrors the plain-config-struct-with-chained-setters shape used
/// throughout this crate's sibling cache configuration types, generalized
/// from "one struct per eviction policy" to the single policy this crate
/// implements.
pub struct GroupConfig {
    pub(crate) name: String,
    pub(crate) max_bytes: u64,
    pub(crate) replicas: usize,
    pub(crate) hasher: Option<HashFn>,
    pub(crate) on_evicted: Option<Box<dyn FnMut(&str, &ByteView) + Send>>,
}

impl std::fmt::Debug for GroupConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupConfig")
            .field("name", &self.name)
            .field("max_bytes", &self.max_bytes)
            .field("replicas", &self.replicas)
            .finish()
    }
}

impl GroupConfig {
    /// Starts a config for a group named `name` with the given byte budget.
    /// `max_bytes == 0` means unbounded.
    pub fn new(name: impl Into<String>, max_bytes: u64) -> Self {
        Self {
            name: name.into(),
            max_bytes,
            replicas: DEFAULT_REPLICAS,
            hasher: None,
            on_evicted: None,
        }
    }

    /// Overrides the number of virtual nodes per physical peer on this
    /// group's hash ring. Must be greater than zero.
    #[must_use]
    pub fn replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Overrides the hash function used by this group's hash ring. Defaults
    /// to CRC32/IEEE.
    #[must_use]
    pub fn hasher(mut self, hasher: HashFn) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Installs a callback invoked whenever this group's local cache evicts
    /// an entry.
    #[must_use]
    pub fn on_evicted<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str, &ByteView) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(callback));
        self
    }
}
