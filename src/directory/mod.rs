//! The session & distribution directory.
//!
//! [`Directory`] owns no state of its own: every operation composes scans,
//! batched reads and batched writes against the store and returns either a
//! result or exactly one [`DirectoryError`]. Operations on the same entity are
//! not ordered by the directory; whichever batch reaches the store last wins.

mod aggregator;
mod bitrate_table;
mod change_flag;
mod distribution;
mod enumerator;
mod sessions;

pub use aggregator::ViewerServerOverview;
pub use bitrate_table::BitrateTable;
pub use change_flag::ChangeFlag;
pub use sessions::{Uploader, Viewer};

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use crate::store::{BoundedStore, DirectoryStore};

/// Keys examined per scan page. Each page re-reads the whole key space, so a
/// small count makes a full walk quadratic.
pub const DEFAULT_SCAN_COUNT: usize = 1000;

/// Mapping from an id (uploader, server address) to a number of occurrences.
pub type Counts = BTreeMap<String, u64>;

/// Mapping from an entity id to its ordered server list.
pub type Distribution = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone)]
pub struct Directory {
    store: BoundedStore,
    change_flag: ChangeFlag,
    bitrates: BitrateTable,
    scan_count: usize,
}

impl Directory {
    /// Builds a directory around explicitly shared state handles. Several
    /// directories may share the same flag and bitrate table; both follow
    /// last-writer-wins semantics.
    pub fn new(store: BoundedStore, change_flag: ChangeFlag, bitrates: BitrateTable) -> Self {
        Self {
            store,
            change_flag,
            bitrates,
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }

    /// Builds a directory with the default flag and bitrate keys.
    pub fn open(store: Arc<dyn DirectoryStore>, store_timeout: Duration) -> Self {
        let store = BoundedStore::new(store, store_timeout);
        let change_flag = ChangeFlag::new(store.clone());
        let bitrates = BitrateTable::new(store.clone());

        Self::new(store, change_flag, bitrates)
    }

    pub fn with_scan_count(mut self, scan_count: usize) -> Self {
        self.scan_count = scan_count.max(1);
        self
    }

    pub fn scan_count(&self) -> usize {
        self.scan_count
    }

    pub fn change_flag(&self) -> &ChangeFlag {
        &self.change_flag
    }

    pub fn bitrate_table(&self) -> &BitrateTable {
        &self.bitrates
    }
}
