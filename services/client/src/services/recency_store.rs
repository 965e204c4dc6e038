//! services/client/src/services/recency_store.rs
//!
//! Persistence for the recently-viewed list. The list is loaded lazily on first
//! use and kept in memory for the rest of the process; every mutation writes the
//! whole list back.

use floripedia_core::domain::RecentEntry;
use floripedia_core::ports::KeyValueStore;
use floripedia_core::recency::RecentList;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Storage key of the serialized list.
pub const RECENT_KEY: &str = "recent_plants";

/// Stored shape of one entry.
#[derive(Serialize, Deserialize)]
struct RecentEntryRecord {
    id: String,
    name: String,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}
impl RecentEntryRecord {
    fn to_domain(self) -> RecentEntry {
        RecentEntry {
            id: self.id,
            name: self.name,
            image_url: self.image_url,
            description: self.description,
        }
    }

    fn from_domain(entry: &RecentEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            image_url: entry.image_url.clone(),
            description: entry.description.clone(),
        }
    }
}

/// A handle to the process-wide recently viewed list. Clones share one
/// in-memory list, loaded from storage on first use by any of them.
#[derive(Clone)]
pub struct RecencyStore {
    storage: Arc<dyn KeyValueStore>,
    cache: Arc<Mutex<Option<RecentList>>>,
}

impl RecencyStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    pub fn add(&self, entry: RecentEntry) {
        self.with_list(|list| {
            list.add(entry);
            self.flush(list);
        })
    }

    pub fn list(&self) -> Vec<RecentEntry> {
        self.with_list(|list| list.list().to_vec())
    }

    pub fn paginate(&self, page_size: usize) -> Vec<Vec<RecentEntry>> {
        self.with_list(|list| list.paginate(page_size))
    }

    pub fn clear(&self) {
        self.with_list(|list| {
            list.clear();
            if let Err(e) = self.storage.remove(RECENT_KEY) {
                warn!("Could not clear the stored recent plants: {}", e);
            }
        })
    }

    /// Runs `f` on the loaded list. Writes to storage happen under the same lock.
    fn with_list<R>(&self, f: impl FnOnce(&mut RecentList) -> R) -> R {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let list = cache.get_or_insert_with(|| load(self.storage.as_ref()));
        f(list)
    }

    fn flush(&self, list: &RecentList) {
        let records: Vec<RecentEntryRecord> =
            list.list().iter().map(RecentEntryRecord::from_domain).collect();
        let result = serde_json::to_vec(&records)
            .map_err(|e| e.to_string())
            .and_then(|bytes| self.storage.put(RECENT_KEY, &bytes).map_err(|e| e.to_string()));
        if let Err(e) = result {
            warn!("Could not persist the recent plants: {}", e);
        }
    }
}

/// Absent or unreadable data is an empty list.
fn load(storage: &dyn KeyValueStore) -> RecentList {
    let bytes = match storage.get(RECENT_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return RecentList::new(),
        Err(e) => {
            warn!("Could not read the stored recent plants: {}", e);
            return RecentList::new();
        }
    };
    match serde_json::from_slice::<Vec<RecentEntryRecord>>(&bytes) {
        Ok(records) => {
            RecentList::from_entries(records.into_iter().map(RecentEntryRecord::to_domain).collect())
        }
        Err(e) => {
            debug!("Discarding unreadable recent plants: {}", e);
            RecentList::new()
        }
    }
}
