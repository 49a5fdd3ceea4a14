//! A distributed in-memory cache modeled after groupcache.
//!
//! `ringcache` embeds into a fleet of cooperating processes. Each process owns
//! a shard of a global keyspace, determined by consistent hashing, and serves
//! lookups for the keys it owns. A lookup for a key owned by a peer is routed
//! there transparently; a lookup for a locally-owned key that isn't cached
//! falls through to a caller-supplied loader, with concurrent identical
//! misses collapsed into a single upstream call.
//!
//! ```text
//! Group::get(key)
//!   │
//!   ├─ local Cache hit? ───────────────────────────► return ByteView
//!   │
//!   └─ miss ─► SingleFlight::do_call(key, …)
//!                │
//!                ├─ PeerPicker routes elsewhere? ─► PeerClient::fetch
//!                │                                     │
//!                │                          ok ────────┘──► return (no local caching)
//!                │                          err ─► fall through
//!                │
//!                └─ local loader ─► Cache::insert ─► return
//! ```
//!
//! ## Modules
//!
//! - [`byteview`]: immutable byte payload stored in the cache.
//! - [`lru`]: byte-budgeted LRU with an eviction callback.
//! - [`cache`]: thread-safe, lazily-initialized shell around [`lru::Lru`].
//! - [`hashring`]: consistent hash ring with virtual nodes.
//! - [`singleflight`]: in-flight call deduplication.
//! - [`peer`]: the transport boundary (`PeerPicker` / `PeerClient`).
//! - [`group`]: the namespace orchestrator tying everything together.
//! - [`registry`]: the process-wide `name -> Group` table.
//! - [`config`]: construction-time knobs for a [`group::Group`].
//! - [`metrics`]: per-group counters.
//! - [`error`]: the crate's error type.
//!
//! ## Example
//!
//! ```rust
//! use ringcache::{config::GroupConfig, registry};
//!
//! let config = GroupConfig::new("students", 64 << 20);
//! let group = registry::new_group(config, |key: &str| {
//!     Ok(format!("value-for-{key}").into_bytes())
//! })
//! .unwrap();
//!
//! let value = group.get("alice").unwrap();
//! assert_eq!(value.as_str().unwrap(), "value-for-alice");
//! ```

#![forbid(unsafe_code)]

/// Immutable byte payload stored in the cache.
pub mod byteview;

/// Doubly linked recency list backing [`lru::Lru`], implemented as a safe
/// index-based arena rather than raw pointers.
pub(crate) mod list;

/// Byte-budgeted LRU cache with an eviction callback.
pub mod lru;

/// Thread-safe, lazily-initialized wrapper around [`lru::Lru`].
pub mod cache;

/// Consistent hash ring with virtual nodes.
pub mod hashring;

/// Request coalescing: collapses concurrent identical misses into one call.
pub mod singleflight;

/// The transport boundary a `Group` depends on (`PeerPicker` / `PeerClient`).
pub mod peer;

/// The namespace orchestrator: local cache, peer routing, loader fallback.
pub mod group;

/// The process-wide `name -> Group` table.
pub mod registry;

/// Construction-time configuration for a [`group::Group`].
pub mod config;

/// Per-group observability counters.
pub mod metrics;

/// The crate's error type.
pub mod error;

pub use byteview::ByteView;
pub use config::GroupConfig;
pub use error::Error;
pub use group::{Getter, Group};
pub use peer::{PeerClient, PeerPicker};
