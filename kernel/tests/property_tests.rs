//! Property tests: serde round-trips, replay determinism and the
//! stage/matrix consistency invariant under arbitrary action sequences.

use npa_core::{ProposalRecord, ProposalStage, SignOffParty, UserRole};
use npa_kernel::{ActionRequest, ProposalStore, WorkflowAction};
use npa_test_utils::*;
use proptest::prelude::*;

const ROLES: [UserRole; 10] = [
    UserRole::Maker,
    UserRole::Checker,
    UserRole::ApproverRisk,
    UserRole::ApproverMarket,
    UserRole::ApproverFinance,
    UserRole::ApproverTax,
    UserRole::ApproverLegal,
    UserRole::ApproverOps,
    UserRole::ApproverTech,
    UserRole::Coo,
];

const ACTIONS: [WorkflowAction; 9] = [
    WorkflowAction::Submit,
    WorkflowAction::CheckerApprove,
    WorkflowAction::CheckerReturn,
    WorkflowAction::CheckerReject,
    WorkflowAction::FunctionalApprove,
    WorkflowAction::FunctionalApproveConditional,
    WorkflowAction::FunctionalRework,
    WorkflowAction::FinalApprove,
    WorkflowAction::FinalReject,
];

fn actor_for(role: UserRole) -> npa_core::ActorIdentity {
    match role {
        UserRole::Maker => maker(),
        UserRole::Checker => checker(),
        UserRole::Coo => coo(),
        functional => approver(functional),
    }
}

/// Run `steps` against a fresh engine and return the final record
fn run_sequence(steps: &[(usize, usize, bool)]) -> ProposalRecord {
    let (engine, store, _) = setup_engine();
    let id = seed_draft(&store, credit_and_legal());

    for (role_index, action_index, with_comment) in steps {
        let role = ROLES[role_index % ROLES.len()];
        let action = ACTIONS[action_index % ACTIONS.len()];
        let mut request = ActionRequest::new(id, role, actor_for(role), action);
        if *with_comment {
            request = request
                .with_comment("generated comment")
                .with_conditions(vec!["generated condition".to_string()]);
        }
        // invalid steps are rejected without mutation; that is the point
        let _ = engine.apply(request);
    }

    store.load(id).unwrap()
}

/// Structural state, ignoring wall-clock fields that differ across runs
fn shape(record: &ProposalRecord) -> impl PartialEq + std::fmt::Debug {
    (
        record.stage(),
        record.version(),
        record.required_sign_offs().to_vec(),
        record
            .matrix()
            .iter()
            .map(|(party, d)| {
                (
                    party,
                    d.status,
                    d.comment.clone(),
                    d.conditions.clone(),
                    d.loop_back_count,
                )
            })
            .collect::<Vec<_>>(),
        record.final_approver.clone(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn serde_round_trip_is_lossless(
        steps in proptest::collection::vec((0usize..10, 0usize..9, any::<bool>()), 0..40)
    ) {
        let record = run_sequence(&steps);
        let json = serde_json::to_string(&record).unwrap();
        let restored: ProposalRecord = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, record);
    }

    #[test]
    fn replaying_a_sequence_reproduces_the_same_state(
        steps in proptest::collection::vec((0usize..10, 0usize..9, any::<bool>()), 0..40)
    ) {
        let first = run_sequence(&steps);
        let second = run_sequence(&steps);
        prop_assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn stage_and_matrix_never_drift(
        steps in proptest::collection::vec((0usize..10, 0usize..9, any::<bool>()), 0..60)
    ) {
        let record = run_sequence(&steps);
        match record.stage() {
            // still collecting sign-offs: completion must not have been missed
            ProposalStage::PendingSignOffs => prop_assert!(!record.matrix().all_cleared()),
            // final approval is only reachable with every party cleared
            ProposalStage::PendingFinalApproval | ProposalStage::Approved => {
                prop_assert!(record.matrix().all_cleared());
            }
            ProposalStage::Draft | ProposalStage::PendingChecker => {
                prop_assert!(record.matrix().is_empty());
            }
            _ => {}
        }
        // the required set is immutable under any sequence
        prop_assert_eq!(
            record.required_sign_offs(),
            &[SignOffParty::RmgCredit, SignOffParty::LegalCompliance][..]
        );
    }
}
