//! Role resolution and action authorization.
//!
//! Roles and actions are closed enums dispatched through an explicit
//! lookup table, so adding a role is a compile-time-checked change
//! rather than a string comparison scattered through callers.

use npa_core::{ProposalRecord, ProposalStage, SignOffParty, UserRole};

use crate::api::WorkflowAction;
use crate::error::WorkflowError;

/// Role x action table: which roles may initiate each action.
///
/// Stage and per-party preconditions are enforced separately in
/// [`RoleResolver::can_act`]; this table only answers "is this ever
/// that role's button".
const ACTION_ROLES: &[(WorkflowAction, &[UserRole])] = &[
    (WorkflowAction::Submit, &[UserRole::Maker]),
    (WorkflowAction::CheckerApprove, &[UserRole::Checker]),
    (WorkflowAction::CheckerReturn, &[UserRole::Checker]),
    (WorkflowAction::CheckerReject, &[UserRole::Checker]),
    (WorkflowAction::FunctionalApprove, FUNCTIONAL_ROLES),
    (WorkflowAction::FunctionalApproveConditional, FUNCTIONAL_ROLES),
    (WorkflowAction::FunctionalRework, FUNCTIONAL_ROLES),
    (WorkflowAction::FinalApprove, &[UserRole::Coo]),
    (WorkflowAction::FinalReject, &[UserRole::Coo]),
];

const FUNCTIONAL_ROLES: &[UserRole] = &[
    UserRole::ApproverRisk,
    UserRole::ApproverMarket,
    UserRole::ApproverFinance,
    UserRole::ApproverTax,
    UserRole::ApproverLegal,
    UserRole::ApproverOps,
    UserRole::ApproverTech,
];

/// Maps authenticated roles to sign-off parties and answers
/// authorization queries for the engine and the projector.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleResolver;

impl RoleResolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The sign-off party a role represents, if any.
    ///
    /// Maker and Checker are not parties; COO is the final-approval
    /// role, not a matrix party.
    #[must_use]
    pub fn party_for_role(&self, role: UserRole) -> Option<SignOffParty> {
        match role {
            UserRole::ApproverRisk => Some(SignOffParty::RmgCredit),
            UserRole::ApproverMarket => Some(SignOffParty::RmgMarket),
            UserRole::ApproverFinance => Some(SignOffParty::GroupFinance),
            UserRole::ApproverTax => Some(SignOffParty::GroupTax),
            UserRole::ApproverLegal => Some(SignOffParty::LegalCompliance),
            UserRole::ApproverOps => Some(SignOffParty::TnoOps),
            UserRole::ApproverTech => Some(SignOffParty::TnoTech),
            UserRole::Maker | UserRole::Checker | UserRole::Coo => None,
        }
    }

    /// Roles allowed to initiate `action`
    #[must_use]
    pub fn allowed_roles(&self, action: WorkflowAction) -> &'static [UserRole] {
        ACTION_ROLES
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, roles)| *roles)
            .unwrap_or(&[])
    }

    /// Full authorization check for one action on one proposal.
    ///
    /// Enforces the role table, the stage precondition, and for
    /// functional actions that the mapped party is required on this
    /// proposal and still actionable (`Pending` or `ReworkRequired`),
    /// which prevents double-action once a party has decided.
    pub fn can_act(
        &self,
        role: UserRole,
        record: &ProposalRecord,
        action: WorkflowAction,
    ) -> Result<(), WorkflowError> {
        match action {
            WorkflowAction::FunctionalApprove
            | WorkflowAction::FunctionalApproveConditional
            | WorkflowAction::FunctionalRework => {
                // a role without a party can never hold a matrix entry
                let party = self
                    .party_for_role(role)
                    .ok_or(WorkflowError::UnknownParty { role })?;
                if record.stage() != ProposalStage::PendingSignOffs {
                    return Err(WorkflowError::InvalidTransition {
                        action,
                        stage: record.stage(),
                    });
                }
                match record.matrix().status(party) {
                    Some(status) if status.is_actionable() => Ok(()),
                    // party already decided, or not required on this proposal
                    _ => Err(WorkflowError::InvalidTransition {
                        action,
                        stage: record.stage(),
                    }),
                }
            }
            _ => {
                if !self.allowed_roles(action).contains(&role) {
                    return Err(WorkflowError::InvalidTransition {
                        action,
                        stage: record.stage(),
                    });
                }
                let stage_ok = match action {
                    WorkflowAction::Submit => matches!(
                        record.stage(),
                        ProposalStage::Draft | ProposalStage::ReturnedToMaker
                    ),
                    WorkflowAction::CheckerApprove
                    | WorkflowAction::CheckerReturn
                    | WorkflowAction::CheckerReject => {
                        record.stage() == ProposalStage::PendingChecker
                    }
                    WorkflowAction::FinalApprove | WorkflowAction::FinalReject => {
                        record.stage() == ProposalStage::PendingFinalApproval
                    }
                    _ => unreachable!("functional actions handled above"),
                };
                if stage_ok {
                    Ok(())
                } else {
                    Err(WorkflowError::InvalidTransition {
                        action,
                        stage: record.stage(),
                    })
                }
            }
        }
    }
}
