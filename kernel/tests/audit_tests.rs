//! Audit trail emitted by committed transitions.

use npa_core::{ProposalStage, UserRole};
use npa_kernel::{ActionRequest, WorkflowAction, WorkflowError};
use npa_test_utils::*;

#[test]
fn every_committed_transition_appends_one_event() {
    let (engine, store, log) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());
    advance_to_sign_offs(&engine, id);
    engine.apply(functional_approve(id, UserRole::ApproverRisk)).unwrap();

    let events = log.events_for(id);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].action, WorkflowAction::Submit);
    assert_eq!(events[0].from_stage, ProposalStage::Draft);
    assert_eq!(events[0].to_stage, ProposalStage::PendingChecker);
    assert_eq!(events[1].action, WorkflowAction::CheckerApprove);
    assert_eq!(events[2].action, WorkflowAction::FunctionalApprove);
    assert_eq!(events[2].actor_role, UserRole::ApproverRisk);
    assert_eq!(events[2].actor_name, "David Lee");
    // no stage change on a partial approval
    assert_eq!(events[2].from_stage, ProposalStage::PendingSignOffs);
    assert_eq!(events[2].to_stage, ProposalStage::PendingSignOffs);
}

#[test]
fn failed_actions_emit_nothing() {
    let (engine, store, log) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());

    let err = engine
        .apply(ActionRequest::new(id, UserRole::Coo, coo(), WorkflowAction::FinalApprove))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    assert!(log.events().is_empty());
}

#[test]
fn chain_verifies_across_a_full_lifecycle() {
    let (engine, store, log) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());
    advance_to_sign_offs(&engine, id);
    engine.apply(functional_approve(id, UserRole::ApproverRisk)).unwrap();
    engine
        .apply(functional_rework(id, UserRole::ApproverLegal, "Fix clause 3"))
        .unwrap();
    engine
        .apply(ActionRequest::new(id, UserRole::Maker, maker(), WorkflowAction::Submit))
        .unwrap();
    engine.apply(functional_approve(id, UserRole::ApproverLegal)).unwrap();
    engine
        .apply(
            ActionRequest::new(id, UserRole::Coo, coo(), WorkflowAction::FinalApprove)
                .with_comment("Cleared"),
        )
        .unwrap();

    assert_eq!(log.verify_integrity(), Ok(7));
    let events = log.events_for(id);
    let rework = events
        .iter()
        .find(|e| e.action == WorkflowAction::FunctionalRework)
        .unwrap();
    assert_eq!(rework.comment.as_deref(), Some("Fix clause 3"));
    assert_eq!(rework.to_stage, ProposalStage::ReturnedToMaker);
}
