//! Protocol variants and the shared protocol object.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::http2::Stream;
use crate::socket::SocketAdapter;

/// Wire tag discriminating the protocol a descriptor targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVariant {
    Http1,
    Http2,
}

impl ProtocolVariant {
    /// Map a descriptor tag to a variant; anything else is unknown
    pub fn from_tag(tag: u64) -> Option<Self> {
        match tag {
            0 => Some(Self::Http1),
            1 => Some(Self::Http2),
            _ => None,
        }
    }

    pub fn tag(&self) -> u64 {
        match self {
            Self::Http1 => 0,
            Self::Http2 => 1,
        }
    }
}

impl fmt::Display for ProtocolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http1 => write!(f, "HTTP/1.1"),
            Self::Http2 => write!(f, "HTTP/2"),
        }
    }
}

/// HTTP/1.x server-side protocol object.
pub struct ServerHttp1 {
    socket: Box<dyn SocketAdapter>,
}

impl ServerHttp1 {
    pub fn new(socket: Box<dyn SocketAdapter>) -> Self {
        Self { socket }
    }

    pub fn socket(&self) -> &dyn SocketAdapter {
        self.socket.as_ref()
    }

    pub fn socket_mut(&mut self) -> &mut dyn SocketAdapter {
        self.socket.as_mut()
    }
}

impl fmt::Debug for ServerHttp1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerHttp1")
            .field("secure", &self.socket.is_secure())
            .finish()
    }
}

/// HTTP/2 server-side protocol object with its stream state.
pub struct ServerHttp2 {
    socket: Box<dyn SocketAdapter>,
    stream: Stream,
}

impl ServerHttp2 {
    pub fn new(socket: Box<dyn SocketAdapter>, stream: Stream) -> Self {
        Self { socket, stream }
    }

    pub fn socket(&self) -> &dyn SocketAdapter {
        self.socket.as_ref()
    }

    pub fn socket_mut(&mut self) -> &mut dyn SocketAdapter {
        self.socket.as_mut()
    }

    pub fn stream(&self) -> &Stream {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut Stream {
        &mut self.stream
    }
}

impl fmt::Debug for ServerHttp2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerHttp2")
            .field("secure", &self.socket.is_secure())
            .field("stream", &self.stream)
            .finish()
    }
}

/// The protocol object behind one request/response pair.
#[derive(Debug)]
pub enum ServerProtocol {
    Http1(ServerHttp1),
    Http2(ServerHttp2),
}

impl ServerProtocol {
    pub fn variant(&self) -> ProtocolVariant {
        match self {
            Self::Http1(_) => ProtocolVariant::Http1,
            Self::Http2(_) => ProtocolVariant::Http2,
        }
    }

    pub fn socket(&self) -> &dyn SocketAdapter {
        match self {
            Self::Http1(p) => p.socket(),
            Self::Http2(p) => p.socket(),
        }
    }

    pub fn socket_mut(&mut self) -> &mut dyn SocketAdapter {
        match self {
            Self::Http1(p) => p.socket_mut(),
            Self::Http2(p) => p.socket_mut(),
        }
    }

    /// Stream state, present on HTTP/2 only
    pub fn stream(&self) -> Option<&Stream> {
        match self {
            Self::Http1(_) => None,
            Self::Http2(p) => Some(p.stream()),
        }
    }
}

/// Shared handle to the protocol object.
///
/// Request and response each hold a clone; the object is released when
/// the last clone drops.
pub type ProtocolHandle = Arc<Mutex<ServerProtocol>>;

/// Wrap a protocol object for sharing
pub fn share(protocol: ServerProtocol) -> ProtocolHandle {
    Arc::new(Mutex::new(protocol))
}

/// Acquire a shared protocol object, recovering from a poisoned lock
pub fn lock_protocol(handle: &ProtocolHandle) -> MutexGuard<'_, ServerProtocol> {
    handle
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
