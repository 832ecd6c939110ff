//! # http-bootstrap: request bootstrap and protocol negotiation
//!
//! The layer between a server's accept loop and its protocol engines.
//! The front end parses the wire, serializes each accepted request into
//! a binary descriptor, and hands it over here together with the
//! connected socket. This crate turns that descriptor into typed
//! request and response records for the right protocol, and negotiates
//! the cleartext HTTP/1.1 to HTTP/2 upgrade when a client offers it.
//!
//! ## What it does
//!
//! - **Descriptor decoding**: bounds-checked binary reader with
//!   configurable field and container limits
//! - **Protocol dispatch**: HTTP/1.x and HTTP/2 request construction,
//!   including per-stream settings and seeded header-compression state
//! - **h2c upgrade**: RFC 7540 section 3.2 upgrade offer handling with
//!   a bounded fire-and-forget 101 write
//!
//! ## Example
//!
//! ```ignore
//! use http_bootstrap::prelude::*;
//! use http_bootstrap::http2::LockRegistry;
//!
//! let config = Config::default();
//! let locks = LockRegistry::new();
//! let (request, mut response) = decode_request(&config, &locks, &descriptor, socket)?;
//! if negotiate_h2c(&config, &request, &mut response) {
//!     // connection continues as HTTP/2
//! }
//! ```

pub mod decode;
pub mod dispatch;
pub mod error;
pub mod files;
pub mod http2;
pub mod multimap;
pub mod protocol;
pub mod query;
pub mod request;
pub mod socket;
pub mod upgrade;

pub use dispatch::decode_request;
pub use error::{Error, Result};
pub use files::FileIncoming;
pub use multimap::MultiMap;
pub use protocol::{ProtocolHandle, ProtocolVariant, ServerHttp1, ServerHttp2, ServerProtocol};
pub use request::{Request, Response};
pub use socket::{PlainAdapter, SocketAdapter};
pub use upgrade::negotiate_h2c;

use std::time::Duration;

/// Ceiling on the 101 interim response write (milliseconds)
pub const DEFAULT_UPGRADE_SEND_TIMEOUT_MS: u64 = 5_000;

/// Default limit for a single length-prefixed field (16MB)
pub const DEFAULT_MAX_FIELD_BYTES: usize = 16 * 1024 * 1024;

/// Default limit on entries per descriptor container
pub const DEFAULT_MAX_CONTAINER_ENTRIES: usize = 4096;

/// Configuration for descriptor decoding and upgrade negotiation
///
/// # Example
///
/// ```
/// use http_bootstrap::Config;
/// use std::time::Duration;
///
/// let config = Config::builder()
///     .max_field_bytes(1024 * 1024)
///     .max_container_entries(256)
///     .upgrade_send_timeout(Duration::from_secs(2))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum bytes a single string field may claim (default: 16MB)
    pub max_field_bytes: usize,
    /// Maximum entries per container (default: 4096)
    pub max_container_entries: usize,
    /// Timeout for the 101 interim response write (default: 5s)
    pub upgrade_send_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_field_bytes: DEFAULT_MAX_FIELD_BYTES,
            max_container_entries: DEFAULT_MAX_CONTAINER_ENTRIES,
            upgrade_send_timeout: Duration::from_millis(DEFAULT_UPGRADE_SEND_TIMEOUT_MS),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for bootstrap configuration
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the per-field byte limit
    pub fn max_field_bytes(mut self, bytes: usize) -> Self {
        self.config.max_field_bytes = bytes;
        self
    }

    /// Set the per-container entry limit
    pub fn max_container_entries(mut self, entries: usize) -> Self {
        self.config.max_container_entries = entries;
        self
    }

    /// Set the 101 write timeout
    pub fn upgrade_send_timeout(mut self, timeout: Duration) -> Self {
        self.config.upgrade_send_timeout = timeout;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dispatch::decode_request;
    pub use crate::error::{Error, Result};
    pub use crate::protocol::{ProtocolHandle, ProtocolVariant};
    pub use crate::request::{Request, Response};
    pub use crate::socket::SocketAdapter;
    pub use crate::upgrade::negotiate_h2c;
    pub use crate::Config;
}
