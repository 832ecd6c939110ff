//! HTTP/2 stream bootstrap.
//!
//! The front end has already performed connection setup and frame
//! parsing; this module carries the per-stream state the descriptor
//! delivers: negotiated settings, the header-compression dynamic table
//! seeded from the connection, and the cross-stream lock guarding it.

mod stream;
mod table;

pub use stream::Stream;
pub use table::{CrossStreamLock, DynamicTable, LockRegistry};

/// Connection-level settings, in the order the descriptor carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub header_table_size: u32,
    pub enable_push: u32,
    pub max_concurrent_streams: u32,
    pub initial_window_size: u32,
    pub max_frame_size: u32,
    pub max_header_list_size: u32,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            header_table_size: 4096,
            enable_push: 1,
            max_concurrent_streams: 100,
            initial_window_size: 65_535,
            max_frame_size: 16_384,
            max_header_list_size: 16_384,
        }
    }
}
