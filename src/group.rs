//! The namespace orchestrator: local cache, peer routing, loader fallback.

use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, warn};

use crate::byteview::ByteView;
use crate::cache::Cache;
use crate::config::GroupConfig;
use crate::error::Error;
use crate::hashring::{HashFn, HashRing};
use crate::metrics::{GroupMetrics, GroupMetricsSnapshot};
use crate::peer::{PeerClient, PeerPicker};
use crate::singleflight::SingleFlight;

/// Fetches the bytes for a key from the source of truth.
///
/// Blanket-implemented for closures so a plain `Fn(&str) -> Result<..>` can
/// be passed directly wherever a `Getter` is expected.
pub trait Getter: Send + Sync {
    /// Loads the value for `key`, or an error describing why it could not be
    /// loaded (e.g. not found upstream).
    fn get(&self, key: &str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>;
}

impl<F> Getter for F
where
    F: Fn(&str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> + Send + Sync,
{
    fn get(&self, key: &str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        self(key)
    }
}

/// A named cache namespace: local cache, optional peer routing, and a
/// loader for local misses.
pub struct Group {
    name: String,
    getter: Box<dyn Getter>,
    local_cache: Cache,
    flight: SingleFlight,
    picker: RwLock<Option<Arc<dyn PeerPicker>>>,
    metrics: GroupMetrics,
    replicas: usize,
    hasher: Mutex<Option<HashFn>>,
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group").field("name", &self.name).finish()
    }
}

impl Group {
    pub(crate) fn new(config: GroupConfig, getter: Box<dyn Getter>) -> Self {
        assert!(
            config.replicas > 0,
            "GroupConfig replicas must be greater than zero"
        );
        let GroupConfig {
            name,
            max_bytes,
            replicas,
            hasher,
            on_evicted,
        } = config;
        let metrics = GroupMetrics::default();
        let local_cache = match on_evicted {
            Some(mut cb) => Cache::new(max_bytes).with_on_evicted_hook(move |k, v| cb(k, v)),
            None => Cache::new(max_bytes),
        };
        Self {
            name,
            getter,
            local_cache,
            flight: SingleFlight::new(),
            picker: RwLock::new(None),
            metrics,
            replicas,
            hasher: Mutex::new(hasher),
        }
    }

    /// Name of this namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up `key`: a local cache hit returns immediately; a miss enters
    /// the single-flight coalescer, which either routes to a peer or falls
    /// back to the local loader.
    pub fn get(&self, key: &str) -> Result<ByteView, Error> {
        self.metrics.record_get();
        if key.is_empty() {
            return Err(Error::InvalidInput);
        }
        if let Some(hit) = self.local_cache.get(key, &self.metrics) {
            debug!(group = %self.name, key, "local cache hit");
            return Ok(hit);
        }
        self.load(key)
    }

    /// Registers the peer picker used to route keys not owned locally.
    ///
    /// May be called at most once per `Group`; a second call is a programmer
    /// error.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) {
        let mut guard = self.picker.write().unwrap();
        assert!(
            guard.is_none(),
            "register_peers called more than once on group '{}'",
            self.name
        );
        *guard = Some(picker);
    }

    /// Builds and registers a ring-based `PeerPicker` from a flat address
    /// list, using this group's configured replica count and hash function.
    ///
    /// A convenience for transports that only need "here are the peer
    /// addresses and how to reach each one" rather than a fully custom
    /// [`PeerPicker`]. `local` is this process's own address, used to detect
    /// keys the ring assigns to the local process.
    pub fn register_peer_addresses<C>(&self, local: impl Into<String>, clients: std::collections::HashMap<String, Arc<C>>)
    where
        C: PeerClient + 'static,
    {
        let picker = RingPeerPicker::new(local, self.replicas);
        if let Some(hasher) = self.hasher.lock().unwrap().take() {
            picker.set_hasher(hasher);
        }
        picker.set_peers(clients);
        self.register_peers(Arc::new(picker));
    }

    /// Snapshot of this group's counters.
    pub fn metrics(&self) -> GroupMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Does the actual miss handling, run inside the single-flight call so
    /// that concurrent misses for the same key — whether they end up routed
    /// to a peer or to the local loader — still collapse to one attempt.
    fn load(&self, key: &str) -> Result<ByteView, Error> {
        let picker = self.picker.read().unwrap().clone();
        self.flight.do_call(key, move || {
            if let Some(peer) = picker.as_ref().and_then(|p| p.pick_peer(key)) {
                match Self::get_from_peer(&self.name, key, peer.as_ref()) {
                    Ok(view) => {
                        self.metrics.record_peer_hit();
                        return Ok(view);
                    }
                    Err(err) => {
                        self.metrics.record_peer_error();
                        warn!(group = %self.name, key, error = %err, "peer fetch failed, falling back to local loader");
                    }
                }
            }
            self.get_local(key)
        })
    }

    fn get_from_peer(group: &str, key: &str, peer: &dyn PeerClient) -> Result<ByteView, Error> {
        let bytes = peer.fetch(group, key)?;
        Ok(ByteView::from(bytes))
    }

    fn get_local(&self, key: &str) -> Result<ByteView, Error> {
        self.metrics.record_loader_call();
        match self.getter.get(key) {
            Ok(bytes) => {
                let view = ByteView::from(bytes);
                self.local_cache.insert(key.to_string(), view.clone(), &self.metrics);
                Ok(view)
            }
            Err(err) => {
                self.metrics.record_loader_error();
                Err(Error::LoaderFailure(err.to_string()))
            }
        }
    }
}

/// Builds a `HashRing`-backed `PeerPicker` that routes to `peers` and treats
/// `local` as "don't route, serve locally".
///
/// Not part of the core `Group`/`PeerPicker` contract — provided as a
/// ready-made strategy for transports that want ring-based routing without
/// reimplementing it, grounded in the ring-based HTTP pool this crate's
/// design is modeled after.
pub struct RingPeerPicker<C> {
    local: String,
    replicas: usize,
    hasher: Mutex<Option<HashFn>>,
    ring: RwLock<HashRing>,
    clients: RwLock<std::collections::HashMap<String, Arc<C>>>,
}

impl<C> std::fmt::Debug for RingPeerPicker<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingPeerPicker")
            .field("local", &self.local)
            .field("replicas", &self.replicas)
            .finish()
    }
}

impl<C: PeerClient + 'static> RingPeerPicker<C> {
    /// Builds a picker for the local address `local`, with an empty ring.
    pub fn new(local: impl Into<String>, replicas: usize) -> Self {
        Self {
            local: local.into(),
            replicas,
            hasher: Mutex::new(None),
            ring: RwLock::new(HashRing::new(replicas)),
            clients: RwLock::new(std::collections::HashMap::new()),
        }
    }

    /// Overrides the hash function used when `set_peers` next rebuilds the
    /// ring. Defaults to CRC32/IEEE if never called.
    pub fn set_hasher(&self, hasher: HashFn) {
        *self.hasher.lock().unwrap() = Some(hasher);
    }

    /// Replaces the full peer set. `peers` maps address to client handle.
    pub fn set_peers(&self, peers: std::collections::HashMap<String, Arc<C>>) {
        let mut ring = match self.hasher.lock().unwrap().take() {
            Some(hasher) => HashRing::with_hash_fn(self.replicas, hasher),
            None => HashRing::new(self.replicas),
        };
        ring.add(peers.keys().cloned());
        *self.ring.write().unwrap() = ring;
        *self.clients.write().unwrap() = peers;
    }
}

impl<C: PeerClient + 'static> PeerPicker for RingPeerPicker<C> {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerClient>> {
        let ring = self.ring.read().unwrap();
        let node = ring.get(key)?;
        if node == self.local {
            return None;
        }
        let clients = self.clients.read().unwrap();
        clients
            .get(node)
            .map(|c| Arc::clone(c) as Arc<dyn PeerClient>)
    }
}
