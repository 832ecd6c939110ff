//! Per-stream bootstrap state.

use super::{ConnectionSettings, CrossStreamLock, DynamicTable};

/// State of one HTTP/2 stream at handover time.
///
/// The table is this stream's own snapshot of the connection's header
/// compression state; the lock guards the live connection table that
/// all streams share.
#[derive(Debug)]
pub struct Stream {
    id: u32,
    settings: ConnectionSettings,
    table: DynamicTable,
    lock: CrossStreamLock,
}

impl Stream {
    pub fn new(
        id: u32,
        settings: ConnectionSettings,
        table: DynamicTable,
        lock: CrossStreamLock,
    ) -> Self {
        Self {
            id,
            settings,
            table,
            lock,
        }
    }

    /// Stream identifier assigned by the front end
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Settings negotiated on the parent connection
    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// This stream's seeded dynamic table snapshot
    pub fn table(&self) -> &DynamicTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut DynamicTable {
        &mut self.table
    }

    /// Lock guarding the shared connection table
    pub fn lock(&self) -> &CrossStreamLock {
        &self.lock
    }
}
