//! The in-memory window of log records currently held for display.
//!
//! Ordering invariant: strictly non-increasing by timestamp (newest first).
//! Records with equal timestamps keep arrival order: the record merged
//! first stays ahead of later arrivals at the same second. No two records
//! in one window share an identity key.

use std::collections::HashSet;

use crate::record::{LogRecord, RecordKey};

/// Ordered, de-duplicated set of records for the active page selection.
///
/// Created empty on app/level switch or page navigation, repopulated
/// wholesale by [`replace`](LogWindowStore::replace) after a navigation
/// fetch, and extended (never shrunk) by
/// [`merge_new`](LogWindowStore::merge_new) while polling on page 1.
#[derive(Debug, Default)]
pub struct LogWindowStore {
    records: Vec<LogRecord>,
    seen: HashSet<RecordKey>,
}

impl LogWindowStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record, e.g. when the view navigates away.
    pub fn clear(&mut self) {
        self.records.clear();
        self.seen.clear();
    }

    /// Wholesale replacement after a navigation fetch.
    ///
    /// Server order is trusted and not re-sorted, but identity duplicates
    /// are dropped defensively (first occurrence wins). If the server hands
    /// back records violating the non-increasing invariant, the window is
    /// repaired by a stable sort instead of asserting, and the repair is
    /// logged.
    pub fn replace(&mut self, records: Vec<LogRecord>) {
        self.records.clear();
        self.seen.clear();

        let mut dropped = 0usize;
        for record in records {
            let key = record.identity();
            if self.seen.contains(&key) {
                dropped += 1;
                continue;
            }
            self.seen.insert(key);
            self.records.push(record);
        }
        if dropped > 0 {
            tracing::warn!(dropped, "duplicate identity keys in navigation batch");
        }

        if !is_non_increasing(&self.records) {
            tracing::warn!(
                records = self.records.len(),
                "navigation batch out of order; repaired by sort"
            );
            // Stable: equal timestamps keep the server's arrival order.
            self.records
                .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }
    }

    /// Merge a freshly polled batch, preserving order and identity.
    ///
    /// Already-present identity keys are skipped. Each new record is placed
    /// after every record with an equal-or-newer timestamp, so ties land
    /// behind earlier arrivals and re-merging the same batch is a no-op.
    /// Returns how many records were actually inserted.
    pub fn merge_new(&mut self, records: Vec<LogRecord>) -> usize {
        let mut inserted = 0usize;
        for record in records {
            let key = record.identity();
            if self.seen.contains(&key) {
                continue;
            }
            let at = self
                .records
                .partition_point(|held| held.timestamp >= record.timestamp);
            self.records.insert(at, record);
            self.seen.insert(key);
            inserted += 1;
        }
        inserted
    }

    /// Read-only view for filtering, search, and rendering.
    #[must_use]
    pub fn snapshot(&self) -> &[LogRecord] {
        &self.records
    }
}

fn is_non_increasing(records: &[LogRecord]) -> bool {
    records
        .windows(2)
        .all(|pair| pair[0].timestamp >= pair[1].timestamp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
