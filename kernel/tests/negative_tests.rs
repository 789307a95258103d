//! Failure modes: invalid transitions, missing inputs, unauthorized
//! roles and immutability of rejected actions.

use npa_core::{ProposalRecord, ProposalStage, SignOffParty, UserRole};
use npa_kernel::{ActionRequest, ProposalStore, WorkflowAction, WorkflowError};
use npa_test_utils::*;

// Scenario C: final approval is only available from PENDING_FINAL_APPROVAL.
#[test]
fn final_approve_outside_final_stage_is_invalid() {
    let (engine, store, _) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());
    advance_to_sign_offs(&engine, id);

    let err = engine
        .apply(ActionRequest::new(id, UserRole::Coo, coo(), WorkflowAction::FinalApprove))
        .unwrap_err();
    assert_eq!(
        err,
        WorkflowError::InvalidTransition {
            action: WorkflowAction::FinalApprove,
            stage: ProposalStage::PendingSignOffs,
        }
    );
}

// Scenario D: a party cannot act twice once its decision is recorded.
#[test]
fn double_approval_by_same_party_is_invalid() {
    let (engine, store, _) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());
    advance_to_sign_offs(&engine, id);

    engine.apply(functional_approve(id, UserRole::ApproverRisk)).unwrap();
    let err = engine
        .apply(functional_approve(id, UserRole::ApproverRisk))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
}

#[test]
fn rework_without_comment_is_rejected_without_mutation() {
    let (engine, store, _) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());
    advance_to_sign_offs(&engine, id);
    let before = store.load(id).unwrap();

    let err = engine
        .apply(ActionRequest::new(
            id,
            UserRole::ApproverLegal,
            approver(UserRole::ApproverLegal),
            WorkflowAction::FunctionalRework,
        ))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::MissingRequiredInput(_)));
    assert_eq!(store.load(id).unwrap(), before);

    // a blank comment is as good as none
    let err = engine
        .apply(
            ActionRequest::new(
                id,
                UserRole::ApproverLegal,
                approver(UserRole::ApproverLegal),
                WorkflowAction::FunctionalRework,
            )
            .with_comment("   "),
        )
        .unwrap_err();
    assert!(matches!(err, WorkflowError::MissingRequiredInput(_)));
}

#[test]
fn conditional_approval_without_conditions_is_rejected() {
    let (engine, store, _) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());
    advance_to_sign_offs(&engine, id);

    let err = engine
        .apply(ActionRequest::new(
            id,
            UserRole::ApproverRisk,
            approver(UserRole::ApproverRisk),
            WorkflowAction::FunctionalApproveConditional,
        ))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::MissingRequiredInput(_)));
}

#[test]
fn role_without_party_cannot_take_functional_actions() {
    let (engine, store, _) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());
    advance_to_sign_offs(&engine, id);

    let err = engine
        .apply(ActionRequest::new(id, UserRole::Coo, coo(), WorkflowAction::FunctionalApprove))
        .unwrap_err();
    assert_eq!(err, WorkflowError::UnknownParty { role: UserRole::Coo });
}

#[test]
fn approver_whose_party_is_not_required_cannot_act() {
    let (engine, store, _) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());
    advance_to_sign_offs(&engine, id);

    // Group Tax is not in the required set
    let err = engine
        .apply(functional_approve(id, UserRole::ApproverTax))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
}

#[test]
fn functional_actions_blocked_outside_sign_off_stage() {
    let (engine, store, _) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());
    // still in Draft
    let err = engine
        .apply(functional_approve(id, UserRole::ApproverRisk))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));

    // rework loop: functional actions also blocked while returned
    advance_to_sign_offs(&engine, id);
    engine
        .apply(functional_rework(id, UserRole::ApproverLegal, "Fix clause 3"))
        .unwrap();
    let err = engine
        .apply(functional_approve(id, UserRole::ApproverRisk))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
}

#[test]
fn checker_cannot_act_before_submission() {
    let (engine, store, _) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());

    let err = engine
        .apply(ActionRequest::new(id, UserRole::Checker, checker(), WorkflowAction::CheckerApprove))
        .unwrap_err();
    assert_eq!(
        err,
        WorkflowError::InvalidTransition {
            action: WorkflowAction::CheckerApprove,
            stage: ProposalStage::Draft,
        }
    );
}

#[test]
fn submit_requires_title_and_description() {
    let (engine, store, _) = setup_engine();
    let record = ProposalRecord::new("", "", maker(), credit_and_legal());
    let id = record.id;
    store.insert(record).unwrap();

    let err = engine
        .apply(ActionRequest::new(id, UserRole::Maker, maker(), WorkflowAction::Submit))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::MissingRequiredInput(_)));
    assert_eq!(store.load(id).unwrap().stage(), ProposalStage::Draft);
}

#[test]
fn unknown_proposal_id_is_not_found() {
    let (engine, _, _) = setup_engine();
    let id = npa_core::ProposalId::new();
    let err = engine
        .apply(ActionRequest::new(id, UserRole::Maker, maker(), WorkflowAction::Submit))
        .unwrap_err();
    assert_eq!(err, WorkflowError::NotFound(id));
}

#[test]
fn terminal_stages_admit_no_further_actions() {
    let (engine, store, _) = setup_engine();
    let id = seed_draft(&store, vec![SignOffParty::RmgCredit]);
    advance_to_sign_offs(&engine, id);
    engine.apply(functional_approve(id, UserRole::ApproverRisk)).unwrap();
    engine
        .apply(ActionRequest::new(id, UserRole::Coo, coo(), WorkflowAction::FinalApprove))
        .unwrap();

    for (role, actor, action) in [
        (UserRole::Maker, maker(), WorkflowAction::Submit),
        (UserRole::Checker, checker(), WorkflowAction::CheckerApprove),
        (UserRole::Coo, coo(), WorkflowAction::FinalReject),
    ] {
        let err = engine
            .apply(ActionRequest::new(id, role, actor, action).with_comment("too late"))
            .unwrap_err();
        assert!(
            matches!(err, WorkflowError::InvalidTransition { .. }),
            "{action} should be invalid after approval"
        );
    }
}
