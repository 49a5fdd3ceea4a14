//! The transport boundary a [`crate::group::Group`] depends on.
//!
//! These two traits are the entire contract between the cache core and
//! whatever RPC or HTTP transport a consuming binary wires up. The core never
//! reaches past them; a transport implementation only needs to satisfy them
//! to interoperate.

use std::sync::Arc;

use crate::error::Error;

/// Resolves a key to the peer that owns it.
pub trait PeerPicker: Send + Sync {
    /// Returns the `PeerClient` for the remote owner of `key`, or `None` if
    /// the local process owns it (or no peers are registered).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerClient>>;
}

/// A handle to a remote peer capable of answering value requests.
pub trait PeerClient: Send + Sync {
    /// Fetches the raw bytes for `key` within `group` from this peer.
    fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>, Error>;
}
