//! The proposal aggregate.

use crate::matrix::SignOffMatrix;
use crate::types::{ActorIdentity, ProposalId, ProposalStage, SignOffParty};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The NPA proposal aggregate mutated by the workflow engine.
///
/// Writes go exclusively through `npa_kernel::WorkflowEngine`; the
/// read-side projector and any UI consume it read-only. The required
/// sign-off set is fixed at creation (classification time) and cannot
/// change for the life of the proposal instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub id: ProposalId,
    pub title: String,
    pub description: String,
    pub submitted_by: ActorIdentity,
    stage: ProposalStage,
    required_sign_offs: Vec<SignOffParty>,
    sign_off_matrix: SignOffMatrix,
    pub final_approver: Option<String>,
    pub final_approval_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    version: u64,
}

impl ProposalRecord {
    /// Create a new proposal in `Draft` with its classified sign-off set
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        submitted_by: ActorIdentity,
        required_sign_offs: Vec<SignOffParty>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProposalId::new(),
            title: title.into(),
            description: description.into(),
            submitted_by,
            stage: ProposalStage::Draft,
            required_sign_offs,
            sign_off_matrix: SignOffMatrix::new(),
            final_approver: None,
            final_approval_date: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Current workflow stage
    #[inline]
    #[must_use]
    pub fn stage(&self) -> ProposalStage {
        self.stage
    }

    /// The classified sign-off set; immutable for this instance
    #[inline]
    #[must_use]
    pub fn required_sign_offs(&self) -> &[SignOffParty] {
        &self.required_sign_offs
    }

    /// Read access to the matrix
    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &SignOffMatrix {
        &self.sign_off_matrix
    }

    /// Optimistic-concurrency token, bumped on every committed transition
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether `party` is required for this proposal
    #[must_use]
    pub fn requires(&self, party: SignOffParty) -> bool {
        self.required_sign_offs.contains(&party)
    }

    // --- engine-facing mutators -------------------------------------
    //
    // These are public because the engine lives in a separate crate,
    // but nothing else should call them.

    /// Set the aggregate stage
    pub fn set_stage(&mut self, stage: ProposalStage) {
        self.stage = stage;
    }

    /// Mutable access to the matrix for recording decisions
    pub fn matrix_mut(&mut self) -> &mut SignOffMatrix {
        &mut self.sign_off_matrix
    }

    /// Initialize the matrix from the required sign-off set
    pub fn initialize_matrix(&mut self) {
        let parties = self.required_sign_offs.clone();
        self.sign_off_matrix.initialize(&parties);
    }

    /// Stamp a committed transition: bump version, touch `updated_at`
    pub fn commit(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }
}
