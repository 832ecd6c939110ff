//! Error types for the bootstrap layer

use std::fmt;
use std::io;

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bootstrap error types
#[derive(Debug)]
pub enum Error {
    /// I/O error from the underlying socket
    Io(io::Error),
    /// Descriptor carried a protocol tag outside the known set
    UnknownVariant(u64),
    /// Descriptor buffer ended before a field could be read
    Truncated {
        /// Bytes the pending read required
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },
    /// A length prefix exceeded the configured limit
    Oversized(&'static str),
    /// A decoded field held an invalid value
    Malformed(&'static str),
    /// Cross-stream lock token not present in the registry
    UnknownLockToken(u64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::UnknownVariant(tag) => write!(f, "Unknown protocol variant tag: {}", tag),
            Error::Truncated { needed, remaining } => write!(
                f,
                "Descriptor truncated: needed {} bytes, {} remaining",
                needed, remaining
            ),
            Error::Oversized(msg) => write!(f, "Field over limit: {}", msg),
            Error::Malformed(msg) => write!(f, "Malformed field: {}", msg),
            Error::UnknownLockToken(token) => {
                write!(f, "Unknown cross-stream lock token: {:#x}", token)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::UnknownVariant(255);
        assert_eq!(err.to_string(), "Unknown protocol variant tag: 255");

        let err = Error::Truncated {
            needed: 8,
            remaining: 3,
        };
        assert_eq!(
            err.to_string(),
            "Descriptor truncated: needed 8 bytes, 3 remaining"
        );
    }

    #[test]
    fn test_io_source() {
        use std::error::Error as _;

        let err = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(err.source().is_some());
        assert!(Error::UnknownVariant(2).source().is_none());
    }
}
