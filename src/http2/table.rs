//! Header-compression dynamic table and its cross-stream sharing
//! machinery.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Per-entry overhead in the size calculation, fixed by RFC 7541
const ENTRY_OVERHEAD: usize = 32;

/// HPACK dynamic table with size-bounded eviction.
///
/// Entries are kept newest-first. Size accounting follows RFC 7541
/// section 4.1: name length + value length + 32 octets per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicTable {
    entries: VecDeque<(String, String)>,
    size: usize,
    max_size: usize,
    max_list_size: usize,
}

impl DynamicTable {
    pub fn new(max_size: u32, max_list_size: u32) -> Self {
        Self {
            entries: VecDeque::new(),
            size: 0,
            max_size: max_size as usize,
            max_list_size: max_list_size as usize,
        }
    }

    /// Build a table pre-populated with connection state.
    ///
    /// `seed` is ordered newest-first, matching the table's own layout.
    /// Entries that overflow `max_size` are evicted from the old end.
    pub fn seeded(
        max_size: u32,
        max_list_size: u32,
        seed: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut table = Self::new(max_size, max_list_size);
        for (name, value) in seed {
            table.size += Self::entry_size(&name, &value);
            table.entries.push_back((name, value));
        }
        table.evict();
        table
    }

    fn entry_size(name: &str, value: &str) -> usize {
        name.len() + value.len() + ENTRY_OVERHEAD
    }

    fn evict(&mut self) {
        while self.size > self.max_size {
            match self.entries.pop_back() {
                Some((name, value)) => {
                    self.size -= Self::entry_size(&name, &value);
                }
                None => break,
            }
        }
    }

    /// Insert an entry at the newest position, evicting as needed.
    ///
    /// An entry larger than the whole table empties it, per RFC 7541
    /// section 4.4.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        self.size += Self::entry_size(&name, &value);
        self.entries.push_front((name, value));
        self.evict();
    }

    /// Shrink or grow the table ceiling, evicting to fit
    pub fn set_max_size(&mut self, max_size: u32) {
        self.max_size = max_size as usize;
        self.evict();
    }

    /// Entries newest-first
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current size in octets, including per-entry overhead
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn max_list_size(&self) -> usize {
        self.max_list_size
    }
}

impl Default for DynamicTable {
    fn default() -> Self {
        Self::new(4096, 16_384)
    }
}

/// Shared handle to a connection's dynamic table.
///
/// Streams of one connection clone the same lock; the table they guard
/// lives as long as any clone does.
#[derive(Debug, Clone, Default)]
pub struct CrossStreamLock {
    inner: Arc<Mutex<DynamicTable>>,
}

impl CrossStreamLock {
    pub fn new(table: DynamicTable) -> Self {
        Self {
            inner: Arc::new(Mutex::new(table)),
        }
    }

    /// Acquire the table, recovering from a poisoned lock.
    ///
    /// A panic while holding the guard leaves the table in whatever
    /// state the writer reached; header compression state is
    /// best-effort at that point, not corrupt memory.
    pub fn lock(&self) -> MutexGuard<'_, DynamicTable> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether two handles guard the same table
    pub fn shares_table_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Registry resolving descriptor tokens to cross-stream locks.
///
/// The accept layer registers a lock per connection and carries the
/// token through the descriptor; streams resolve it here instead of
/// trusting a raw address off the wire.
#[derive(Debug, Default)]
pub struct LockRegistry {
    slots: Mutex<HashMap<u64, CrossStreamLock>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lock under `token`, replacing any previous holder
    pub fn register(&self, token: u64, lock: CrossStreamLock) {
        self.slots_guard().insert(token, lock);
    }

    /// Resolve `token` to a clone of its lock
    pub fn get(&self, token: u64) -> Option<CrossStreamLock> {
        self.slots_guard().get(&token).cloned()
    }

    /// Drop the registry's reference; outstanding clones stay valid
    pub fn release(&self, token: u64) -> Option<CrossStreamLock> {
        self.slots_guard().remove(&token)
    }

    fn slots_guard(&self) -> MutexGuard<'_, HashMap<u64, CrossStreamLock>> {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
