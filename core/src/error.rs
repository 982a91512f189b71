//! Error types for the PetFriends API client.
//!
//! # Design
//! HTTP error statuses are not errors here: a 403 or a 500 comes back as an
//! `ApiResponse` carrying the raw body, and callers inspect it. `ApiError`
//! covers what happens outside a well-formed exchange: precondition failures
//! detected before a request is built, transport failures reported by the
//! host, and 200 responses whose body does not match the expected shape.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by `PetFriendsApi` and the hosts built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The auth key carries no `key` token. Raised before any request exists.
    #[error("auth key has no \"key\" entry")]
    MissingCredential,

    /// The photo to upload does not exist. Raised before any request exists.
    #[error("photo file not found: {}", path.display())]
    PhotoNotFound { path: PathBuf },

    /// The photo exists but could not be read.
    #[error("failed to read photo {}: {source}", path.display())]
    PhotoUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The host failed to complete the HTTP exchange.
    #[error("transport error: {0}")]
    Transport(String),

    /// A 200 response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A non-200 response was unwrapped with `ApiResponse::into_parsed`.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}
