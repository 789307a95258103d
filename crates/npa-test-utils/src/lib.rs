//! Testing utilities for the NPA workflow workspace
//!
//! Shared fixtures: standard actors, party sets, proposal builders and
//! engine setup helpers used across the kernel's integration tests.

use npa_core::{ActorIdentity, ProposalId, ProposalRecord, SignOffParty, UserRole};
use npa_kernel::{
    ActionRequest, MemoryStore, ProposalStore, TransitionLog, WorkflowAction, WorkflowEngine,
};
use std::sync::Arc;

/// The standard maker used by fixtures
pub fn maker() -> ActorIdentity {
    ActorIdentity::new("u1", "Sarah Jenkins")
}

/// A second maker, for cross-actor visibility tests
pub fn other_maker() -> ActorIdentity {
    ActorIdentity::new("u9", "Tom Ng")
}

pub fn checker() -> ActorIdentity {
    ActorIdentity::new("u2", "Rajiv Kumar")
}

pub fn coo() -> ActorIdentity {
    ActorIdentity::new("u7", "Vikramaditya")
}

/// Display identity for a functional approver role
pub fn approver(role: UserRole) -> ActorIdentity {
    match role {
        UserRole::ApproverRisk => ActorIdentity::new("u3", "David Lee"),
        UserRole::ApproverMarket => ActorIdentity::new("u3b", "Lisa Wong"),
        UserRole::ApproverFinance => ActorIdentity::new("u4", "Amanda Low"),
        UserRole::ApproverTax => ActorIdentity::new("u4b", "Simon Tan"),
        UserRole::ApproverLegal => ActorIdentity::new("u5b", "James Tan"),
        UserRole::ApproverOps => ActorIdentity::new("u5", "Raj Patel"),
        UserRole::ApproverTech => ActorIdentity::new("u6", "Mei Lin"),
        other => panic!("{other} is not a functional approver"),
    }
}

/// The two-party set used by the scenario tests
pub fn credit_and_legal() -> Vec<SignOffParty> {
    vec![SignOffParty::RmgCredit, SignOffParty::LegalCompliance]
}

/// Fresh engine over an empty in-memory store
pub fn setup_engine() -> (WorkflowEngine, Arc<MemoryStore>, Arc<TransitionLog>) {
    let store = Arc::new(MemoryStore::new());
    let log = Arc::new(TransitionLog::new());
    let engine = WorkflowEngine::new(store.clone(), log.clone());
    (engine, store, log)
}

/// Insert a draft proposal owned by the standard maker
pub fn seed_draft(store: &MemoryStore, parties: Vec<SignOffParty>) -> ProposalId {
    seed_draft_by(store, maker(), parties)
}

/// Insert a draft proposal owned by `owner`
pub fn seed_draft_by(
    store: &MemoryStore,
    owner: ActorIdentity,
    parties: Vec<SignOffParty>,
) -> ProposalId {
    let record = ProposalRecord::new(
        "FX Put Option GBP/USD - Product Variation",
        "New FX structure for Acme Corp",
        owner,
        parties,
    );
    let id = record.id;
    store.insert(record).unwrap();
    id
}

/// Drive a draft through submission and checker approval into the
/// sign-off phase
pub fn advance_to_sign_offs(engine: &WorkflowEngine, id: ProposalId) {
    engine
        .apply(ActionRequest::new(
            id,
            UserRole::Maker,
            maker(),
            WorkflowAction::Submit,
        ))
        .unwrap();
    engine
        .apply(ActionRequest::new(
            id,
            UserRole::Checker,
            checker(),
            WorkflowAction::CheckerApprove,
        ))
        .unwrap();
}

/// Functional approval request for `role`
pub fn functional_approve(id: ProposalId, role: UserRole) -> ActionRequest {
    ActionRequest::new(id, role, approver(role), WorkflowAction::FunctionalApprove)
}

/// Rework request for `role` with `comment`
pub fn functional_rework(id: ProposalId, role: UserRole, comment: &str) -> ActionRequest {
    ActionRequest::new(id, role, approver(role), WorkflowAction::FunctionalRework)
        .with_comment(comment)
}
