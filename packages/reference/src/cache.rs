//! In-process memo of admitted reference voices.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use refvoice_domain::ReferenceAudioRecord;

/// Map of `voice_id` to the record admitted for it.
///
/// Only successful resolutions are stored. Entries are never evicted; an
/// insert for an existing key replaces it.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    records: RwLock<HashMap<String, Arc<ReferenceAudioRecord>>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, voice_id: &str) -> Option<Arc<ReferenceAudioRecord>> {
        self.records.read().get(voice_id).cloned()
    }

    /// Last writer wins.
    pub fn insert(&self, record: ReferenceAudioRecord) -> Arc<ReferenceAudioRecord> {
        let record = Arc::new(record);
        self.records
            .write()
            .insert(record.voice_id.clone(), Arc::clone(&record));
        record
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Cached voice ids, sorted.
    pub fn voice_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}
