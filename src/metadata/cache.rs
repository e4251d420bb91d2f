use crate::metadata::types::{ChannelMetadata, ResolutionKey};
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-lifetime memo of resolutions. Unbounded, no TTL, no eviction.
///
/// Concurrent writers for the same key race; the last one wins.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<ResolutionKey, ChannelMetadata>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ResolutionKey) -> Option<ChannelMetadata> {
        // A panicked writer cannot leave a half-written entry behind, so poisoning is ignored.
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    pub fn insert(&self, key: ResolutionKey, value: ChannelMetadata) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
