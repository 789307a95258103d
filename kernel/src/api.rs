//! Kernel API surface: actions, action requests and the persistence
//! contract the engine requires from its collaborators.

use npa_core::{ActorIdentity, ProposalId, ProposalRecord, UserRole};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Every actor-initiated workflow action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowAction {
    /// Maker submits a draft, or resubmits after a return
    Submit,
    /// Checker clears the proposal into the sign-off phase
    CheckerApprove,
    /// Checker sends the proposal back to the maker with a reason
    CheckerReturn,
    /// Checker rejects outright (terminal)
    CheckerReject,
    /// A functional approver clears their party
    FunctionalApprove,
    /// A functional approver clears their party subject to conditions
    FunctionalApproveConditional,
    /// A functional approver sends the proposal back for rework
    FunctionalRework,
    /// COO grants final approval (terminal)
    FinalApprove,
    /// COO rejects at final approval (terminal)
    FinalReject,
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowAction::Submit => "SUBMIT",
            WorkflowAction::CheckerApprove => "CHECKER_APPROVE",
            WorkflowAction::CheckerReturn => "CHECKER_RETURN",
            WorkflowAction::CheckerReject => "CHECKER_REJECT",
            WorkflowAction::FunctionalApprove => "FUNCTIONAL_APPROVE",
            WorkflowAction::FunctionalApproveConditional => "FUNCTIONAL_APPROVE_CONDITIONAL",
            WorkflowAction::FunctionalRework => "FUNCTIONAL_REWORK",
            WorkflowAction::FinalApprove => "FINAL_APPROVE",
            WorkflowAction::FinalReject => "FINAL_REJECT",
        };
        f.write_str(name)
    }
}

/// One actor action against one proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub proposal_id: ProposalId,
    pub actor_role: UserRole,
    pub actor: ActorIdentity,
    pub action: WorkflowAction,
    /// Decision context; mandatory for rework, return and final reject
    pub comment: Option<String>,
    /// Pre-launch conditions; mandatory for conditional approval
    pub conditions: Vec<String>,
}

impl ActionRequest {
    /// Request with no comment or conditions
    #[must_use]
    pub fn new(
        proposal_id: ProposalId,
        actor_role: UserRole,
        actor: ActorIdentity,
        action: WorkflowAction,
    ) -> Self {
        Self {
            proposal_id,
            actor_role,
            actor,
            action,
            comment: None,
            conditions: Vec::new(),
        }
    }

    /// Attach a comment
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Attach pre-launch conditions
    #[must_use]
    pub fn with_conditions(mut self, conditions: Vec<String>) -> Self {
        self.conditions = conditions;
        self
    }
}

/// Persistence contract required by the engine.
///
/// `save` must compare the stored version against the incoming
/// record's previous version and fail with
/// [`StoreError::VersionConflict`] when another transition committed
/// in between. The engine handles the retry; implementations only
/// detect the conflict.
pub trait ProposalStore: Send + Sync {
    /// Insert a newly created proposal (upstream creation API)
    fn insert(&self, record: ProposalRecord) -> Result<(), StoreError>;

    /// Load the current state of one proposal
    fn load(&self, id: ProposalId) -> Result<ProposalRecord, StoreError>;

    /// Persist a committed transition, enforcing the version check
    fn save(&self, record: ProposalRecord) -> Result<(), StoreError>;

    /// Snapshot of all proposals, for the read-side projector
    fn list(&self) -> Vec<ProposalRecord>;
}
