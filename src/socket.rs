//! Socket seam between the bootstrap layer and the accept loop.
//!
//! The accept loop hands over an already-connected socket behind the
//! [`SocketAdapter`] trait so that plain and TLS transports look the
//! same from here. This layer only ever writes; reads stay with the
//! protocol engines.

use std::io::{self, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Connected transport handed over by the accept loop.
pub trait SocketAdapter: Send {
    /// Write `data`, giving up after `timeout`.
    ///
    /// Returns the number of bytes accepted by the transport. A partial
    /// write is reported as-is; callers treat anything short of the
    /// full buffer as a failed send.
    fn send_timeout(&mut self, data: &[u8], timeout: Duration) -> io::Result<usize>;

    /// Whether the transport is TLS-wrapped
    fn is_secure(&self) -> bool;
}

/// Adapter over a plaintext TCP stream.
#[derive(Debug)]
pub struct PlainAdapter {
    stream: TcpStream,
}

impl PlainAdapter {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl SocketAdapter for PlainAdapter {
    fn send_timeout(&mut self, data: &[u8], timeout: Duration) -> io::Result<usize> {
        self.stream.set_write_timeout(Some(timeout))?;
        let result = self.stream.write(data);
        // Leave the stream without a lingering timeout for later writers
        let _ = self.stream.set_write_timeout(None);
        result
    }

    fn is_secure(&self) -> bool {
        false
    }
}
