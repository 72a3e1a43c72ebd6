//! Single-snapshot state store.
//!
//! Holds the latest whole-state snapshot. Every replacement swaps the whole
//! value and wakes watchers; there is no merging and no partial update.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::snapshot::StateSnapshot;

pub struct StateStore {
    tx: watch::Sender<Option<Arc<StateSnapshot>>>,
    generation: AtomicU64,
}

impl StateStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            tx,
            generation: AtomicU64::new(0),
        }
    }

    /// The latest snapshot, if any call or push has produced one yet.
    pub fn current(&self) -> Option<Arc<StateSnapshot>> {
        self.tx.borrow().clone()
    }

    /// Replace the snapshot wholesale and notify watchers.
    pub fn replace(&self, snapshot: StateSnapshot) -> Arc<StateSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.tx.send_replace(Some(Arc::clone(&snapshot)));
        self.generation.fetch_add(1, Ordering::SeqCst);
        snapshot
    }

    /// Number of replacements so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Watch for replacements, e.g. to drive a re-render loop.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<StateSnapshot>>> {
        self.tx.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snap(value: serde_json::Value) -> StateSnapshot {
        StateSnapshot::from_value(value).unwrap()
    }

    #[test]
    fn starts_empty() {
        let store = StateStore::new();
        assert!(store.current().is_none());
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let store = StateStore::new();
        store.replace(snap(json!({ "uiEdit": true, "previewMode": true })));
        store.replace(snap(json!({ "uiEdit": false })));

        let current = store.current().unwrap();
        assert_eq!(current.ui_edit(), Some(false));
        // No merge with the previous snapshot.
        assert_eq!(current.preview_mode(), None);
        assert_eq!(store.generation(), 2);
    }

    #[tokio::test]
    async fn subscribers_see_replacements() {
        let store = StateStore::new();
        let mut rx = store.subscribe();

        store.replace(snap(json!({ "connectionStatus": "DRIVING" })));

        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone().unwrap();
        assert_eq!(seen.connection_status(), ifl03_common::ConnectionStatus::Driving);
    }
}
