//! In-memory proposal store with optimistic concurrency.

use npa_core::{ProposalId, ProposalRecord};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::api::ProposalStore;
use crate::error::StoreError;

/// `HashMap`-backed store used by tests, the simulator and the CLI.
///
/// `save` enforces the version check: an incoming record at version
/// `n` commits only if the stored record is at `n - 1`. The engine's
/// read-decide-write sequence plus this check serializes transitions
/// per proposal without any per-proposal lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<ProposalId, ProposalRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored proposals
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when no proposals are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl ProposalStore for MemoryStore {
    fn insert(&self, record: ProposalRecord) -> Result<(), StoreError> {
        let mut guard = self.records.write();
        if guard.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        guard.insert(record.id, record);
        Ok(())
    }

    fn load(&self, id: ProposalId) -> Result<ProposalRecord, StoreError> {
        self.records
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn save(&self, record: ProposalRecord) -> Result<(), StoreError> {
        let mut guard = self.records.write();
        let stored = guard
            .get(&record.id)
            .ok_or(StoreError::NotFound(record.id))?;
        // the incoming record was committed from the stored version
        if record.version() != stored.version() + 1 {
            return Err(StoreError::VersionConflict {
                id: record.id,
                stored: stored.version(),
                expected: record.version().saturating_sub(1),
            });
        }
        guard.insert(record.id, record);
        Ok(())
    }

    fn list(&self) -> Vec<ProposalRecord> {
        self.records.read().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use npa_core::{ActorIdentity, SignOffParty};

    fn record() -> ProposalRecord {
        ProposalRecord::new(
            "Title",
            "Description",
            ActorIdentity::new("u1", "Sarah Jenkins"),
            vec![SignOffParty::RmgCredit],
        )
    }

    #[test]
    fn save_rejects_stale_version() {
        let store = MemoryStore::new();
        let base = record();
        store.insert(base.clone()).unwrap();

        // two writers load the same version
        let mut first = store.load(base.id).unwrap();
        let mut second = store.load(base.id).unwrap();

        first.commit(Utc::now());
        store.save(first).unwrap();

        second.commit(Utc::now());
        let err = store.save(second).unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { .. }));
    }

    #[test]
    fn duplicate_insert_rejected() {
        let store = MemoryStore::new();
        let base = record();
        store.insert(base.clone()).unwrap();
        assert_eq!(store.insert(base.clone()), Err(StoreError::Duplicate(base.id)));
    }

    #[test]
    fn load_unknown_id_fails() {
        let store = MemoryStore::new();
        let id = ProposalId::new();
        assert_eq!(store.load(id), Err(StoreError::NotFound(id)));
    }
}
