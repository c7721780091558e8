//! First-seen deduplication of event records
//!
//! Records are identified by their event key: the four fields in order, with
//! the empty string for absent ones, joined by `||`. Later records with an
//! already-seen key are dropped whole; fields are never merged.

use std::collections::HashSet;

use nkg_core::{AttributeKind, EventRecord};

const KEY_SEPARATOR: &str = "||";

/// Drops repeated records while keeping first-seen order
#[derive(Debug, Clone, Default)]
pub struct Deduplicator;

impl Deduplicator {
    /// Create a new deduplicator
    pub fn new() -> Self {
        Self
    }

    /// Keep the first record for each event key
    pub fn dedup(&self, records: impl IntoIterator<Item = EventRecord>) -> Vec<EventRecord> {
        let mut seen: HashSet<String> = HashSet::new();

        records
            .into_iter()
            .filter(|record| seen.insert(event_key(record)))
            .collect()
    }
}

fn event_key(record: &EventRecord) -> String {
    AttributeKind::ALL
        .iter()
        .map(|kind| record.get(*kind).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

// ============================================================================
// Tests
// ============================================================================
