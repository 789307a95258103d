use npa_core::ProposalStage;

use crate::api::WorkflowAction;
use crate::error::WorkflowError;

/// Validates a stage transition.
///
/// Illegal transitions are value-returned errors so callers can test
/// failure handling; the `strict-debug` feature panics instead to
/// catch engine bugs early in development builds.
pub fn validate_transition(
    from: ProposalStage,
    to: ProposalStage,
    action: WorkflowAction,
) -> Result<(), WorkflowError> {
    if allowed(from, to) {
        Ok(())
    } else {
        #[cfg(feature = "strict-debug")]
        panic!("Illegal stage transition attempted: {:?} -> {:?}", from, to);

        #[allow(unreachable_code)]
        Err(WorkflowError::InvalidTransition {
            action,
            stage: from,
        })
    }
}

/// Stages reachable from `from` by any action
pub fn allowed_transitions(from: ProposalStage) -> Vec<ProposalStage> {
    use ProposalStage::*;
    match from {
        Draft => vec![PendingChecker],
        PendingChecker => vec![PendingSignOffs, ReturnedToMaker, Rejected],
        PendingSignOffs => vec![PendingFinalApproval, ReturnedToMaker],
        ReturnedToMaker => vec![PendingChecker, PendingSignOffs],
        PendingFinalApproval => vec![Approved, Rejected],
        Approved => vec![],
        Rejected => vec![],
    }
}

fn allowed(from: ProposalStage, to: ProposalStage) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_stages_have_no_exits() {
        assert!(allowed_transitions(ProposalStage::Approved).is_empty());
        assert!(allowed_transitions(ProposalStage::Rejected).is_empty());
    }

    #[test]
    fn rework_edge_exists_from_sign_offs() {
        assert!(allowed(
            ProposalStage::PendingSignOffs,
            ProposalStage::ReturnedToMaker
        ));
    }

    #[test]
    fn draft_cannot_jump_to_final_approval() {
        let err = validate_transition(
            ProposalStage::Draft,
            ProposalStage::PendingFinalApproval,
            WorkflowAction::Submit,
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    }
}
