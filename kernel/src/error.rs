//! Error taxonomy for the workflow kernel.
//!
//! Every failure is value-returned; the engine never partially applies
//! a transition, so any error leaves the proposal untouched.

use npa_core::{ProposalId, ProposalStage, UserRole};

use crate::api::WorkflowAction;

/// Main workflow error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Action not permitted from the current stage/role combination.
    /// Surfaced to the actor as "action not available".
    #[error("action {action} not available from stage {stage}")]
    InvalidTransition {
        action: WorkflowAction,
        stage: ProposalStage,
    },

    /// Required payload missing, e.g. a rework request without a comment
    #[error("missing required input: {0}")]
    MissingRequiredInput(String),

    /// Role maps to no sign-off party but the action requires one
    #[error("role {role} is not authorized for this action")]
    UnknownParty { role: UserRole },

    /// No proposal with this id
    #[error("proposal {0} not found")]
    NotFound(ProposalId),

    /// A concurrent write survived the single silent retry.
    /// The caller should refresh and re-attempt.
    #[error("proposal {0} was modified concurrently, please refresh")]
    Conflict(ProposalId),
}

impl WorkflowError {
    /// Only version conflicts are worth re-attempting from the caller side
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Errors surfaced by a [`crate::ProposalStore`] implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("proposal {0} not found")]
    NotFound(ProposalId),

    /// Stored version does not match the record being written
    #[error("version conflict on proposal {id}: stored {stored}, write expected {expected}")]
    VersionConflict {
        id: ProposalId,
        stored: u64,
        expected: u64,
    },

    /// A proposal with this id already exists
    #[error("proposal {0} already exists")]
    Duplicate(ProposalId),
}
