//! Hash-chained transition log.
//!
//! Every committed transition appends one event; each event carries
//! the SHA-256 of its predecessor so tampering or reordering is
//! detectable. The log is an in-process collaborator only; durable
//! audit storage is downstream of these events.

use chrono::{DateTime, Utc};
use npa_core::{ProposalId, ProposalStage, UserRole};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::api::WorkflowAction;

/// Unique audit event identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// One committed workflow transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub event_id: EventId,
    pub proposal_id: ProposalId,
    pub action: WorkflowAction,
    pub actor_role: UserRole,
    pub actor_name: String,
    pub from_stage: ProposalStage,
    pub to_stage: ProposalStage,
    pub comment: Option<String>,
    /// Set when this transition tripped the loop-back circuit breaker
    pub escalated: bool,
    pub timestamp: DateTime<Utc>,
    pub prev_hash: [u8; 32],
    pub hash: [u8; 32],
}

/// Append-only, hash-chained log of committed transitions
#[derive(Debug, Default)]
pub struct TransitionLog {
    inner: Mutex<Vec<TransitionEvent>>,
}

impl TransitionLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, linking it to the current chain head
    pub fn append(&self, mut event: TransitionEvent) -> EventId {
        let mut guard = self.inner.lock();
        event.prev_hash = guard.last().map(|e| e.hash).unwrap_or([0u8; 32]);
        event.hash = compute_hash(&event);
        let id = event.event_id;
        guard.push(event);
        id
    }

    /// Snapshot of all events in commit order
    #[must_use]
    pub fn events(&self) -> Vec<TransitionEvent> {
        self.inner.lock().clone()
    }

    /// Events for one proposal, in commit order
    #[must_use]
    pub fn events_for(&self, proposal_id: ProposalId) -> Vec<TransitionEvent> {
        self.inner
            .lock()
            .iter()
            .filter(|e| e.proposal_id == proposal_id)
            .cloned()
            .collect()
    }

    /// Walk the chain and recompute every hash
    pub fn verify_integrity(&self) -> Result<usize, IntegrityViolation> {
        let guard = self.inner.lock();
        let mut prev = [0u8; 32];
        for (index, event) in guard.iter().enumerate() {
            if event.prev_hash != prev {
                return Err(IntegrityViolation { index });
            }
            if event.hash != compute_hash(event) {
                return Err(IntegrityViolation { index });
            }
            prev = event.hash;
        }
        Ok(guard.len())
    }
}

/// Broken link or recomputed-hash mismatch at `index`
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("audit chain integrity violation at event {index}")]
pub struct IntegrityViolation {
    pub index: usize,
}

fn compute_hash(event: &TransitionEvent) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(event.event_id.0.as_bytes());
    hasher.update(event.proposal_id.0.as_bytes());
    hasher.update(event.action.to_string().as_bytes());
    hasher.update([0]);
    hasher.update(event.actor_role.to_string().as_bytes());
    hasher.update([0]);
    hasher.update(event.actor_name.as_bytes());
    hasher.update([0]);
    hasher.update(event.from_stage.to_string().as_bytes());
    hasher.update([0]);
    hasher.update(event.to_stage.to_string().as_bytes());
    hasher.update([0]);
    if let Some(comment) = &event.comment {
        hasher.update(comment.as_bytes());
    }
    hasher.update([0]);
    hasher.update([u8::from(event.escalated)]);
    hasher.update(event.timestamp.timestamp_micros().to_le_bytes());
    hasher.update(event.prev_hash);
    hasher.finalize().into()
}
