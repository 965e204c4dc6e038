//! crates/floripedia_core/src/recency.rs
//!
//! The "recently viewed" list: bounded, deduplicated by id, most recent first.
//! This is a plain value; persistence lives in the service crate.

use crate::domain::RecentEntry;

/// Maximum number of entries kept.
pub const MAX_RECENT: usize = 16;
/// Default number of entries per page.
pub const DEFAULT_PAGE_SIZE: usize = 4;
/// Maximum number of pages handed out by [`RecentList::paginate`].
pub const MAX_PAGES: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentList {
    entries: Vec<RecentEntry>,
}

impl RecentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a list from stored entries, restoring the invariants in case the
    /// stored data was written by something else: first occurrence of an id wins,
    /// anything past [`MAX_RECENT`] is dropped.
    pub fn from_entries(entries: Vec<RecentEntry>) -> Self {
        let mut kept: Vec<RecentEntry> = Vec::with_capacity(entries.len().min(MAX_RECENT));
        for entry in entries {
            if kept.len() == MAX_RECENT {
                break;
            }
            if !kept.iter().any(|e| e.id == entry.id) {
                kept.push(entry);
            }
        }
        Self { entries: kept }
    }

    /// Records a view. An existing entry with the same id is removed wherever it
    /// sits, the new entry goes to the front and the tail is cut back to the cap.
    pub fn add(&mut self, entry: RecentEntry) {
        self.entries.retain(|e| e.id != entry.id);
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_RECENT);
    }

    pub fn list(&self) -> &[RecentEntry] {
        &self.entries
    }

    /// Splits the list into consecutive pages of `page_size`, the last one
    /// possibly shorter, never more than [`MAX_PAGES`] pages.
    pub fn paginate(&self, page_size: usize) -> Vec<Vec<RecentEntry>> {
        if page_size == 0 {
            return Vec::new();
        }
        self.entries
            .chunks(page_size)
            .take(MAX_PAGES)
            .map(|page| page.to_vec())
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
