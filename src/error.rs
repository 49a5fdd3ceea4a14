//! Error types for `ringcache`.

use thiserror::Error;

/// Result type alias for `ringcache` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by a [`crate::group::Group`] lookup or by registry
/// construction.
///
/// The type is `Clone` so that [`crate::singleflight::SingleFlight`] can hand
/// the same error to every caller waiting on a coalesced call.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The key passed to `Group::get` was empty.
    #[error("key is required")]
    InvalidInput,

    /// The user-supplied loader returned an error.
    ///
    /// The underlying loader error is rendered to a string at this boundary
    /// rather than stored directly, since loader errors are not required to
    /// be `Clone` but `Error` must be.
    #[error("loader failed: {0}")]
    LoaderFailure(String),

    /// A remote peer was unreachable or returned a non-success response.
    ///
    /// `Group::load` recovers from this by falling through to the local
    /// loader; it is still constructible so transports can log the failure.
    #[error("peer request failed: {0}")]
    PeerFailure(String),

    /// A group with this name already exists in the registry.
    #[error("group '{0}' already registered")]
    DuplicateGroup(String),
}
