//! Scenario simulator: drives random actor actions against a fresh
//! engine and checks the workflow invariants after every operation.

use npa_core::{ActorIdentity, ProposalId, ProposalRecord, ProposalStage, SignOffParty, UserRole};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{ActionRequest, ProposalStore, WorkflowAction};
use crate::audit::TransitionLog;
use crate::engine::WorkflowEngine;
use crate::error::WorkflowError;
use crate::store::MemoryStore;

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Total operations to execute
    pub total_operations: u64,
    /// Number of proposals seeded into the store
    pub proposals: usize,
    /// Probability of attaching a comment to comment-bearing actions
    pub comment_probability: f64,
    /// Stop on the first invariant violation
    pub stop_on_first_violation: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            total_operations: 10_000,
            proposals: 25,
            comment_probability: 0.8,
            stop_on_first_violation: true,
        }
    }
}

/// Outcome of one simulator run
#[derive(Debug, Clone, Default)]
pub struct SimReport {
    pub operations: u64,
    pub committed: u64,
    pub rejected: u64,
    pub approved_proposals: usize,
    pub rejected_proposals: usize,
    pub violations: Vec<String>,
}

impl SimReport {
    /// True when no invariant was violated
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable summary
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Simulation Report\n");
        out.push_str("=================\n");
        out.push_str(&format!("Operations:          {}\n", self.operations));
        out.push_str(&format!("Committed:           {}\n", self.committed));
        out.push_str(&format!("Rejected (expected): {}\n", self.rejected));
        out.push_str(&format!("Proposals approved:  {}\n", self.approved_proposals));
        out.push_str(&format!("Proposals rejected:  {}\n", self.rejected_proposals));
        out.push_str(&format!("Violations:          {}\n", self.violations.len()));
        for violation in &self.violations {
            out.push_str(&format!("  - {violation}\n"));
        }
        out.push_str(if self.passed() { "RESULT: PASS\n" } else { "RESULT: FAIL\n" });
        out
    }
}

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

/// Run the simulator with `config` and collect a report
pub fn run_simulator(config: SimulatorConfig) -> SimReport {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let log = Arc::new(TransitionLog::new());
    let engine = WorkflowEngine::new(store.clone(), log.clone());

    let maker = ActorIdentity::new("sim-maker", "Sim Maker");
    let mut ids = Vec::with_capacity(config.proposals);
    for index in 0..config.proposals {
        let parties = random_party_set(&mut rng);
        let record = ProposalRecord::new(
            format!("Simulated proposal {index}"),
            "Generated by the scenario simulator",
            maker.clone(),
            parties,
        );
        ids.push(record.id);
        if store.insert(record).is_err() {
            unreachable!("fresh store cannot hold duplicate ids");
        }
    }

    let mut report = SimReport::default();
    // terminal stages must never change once reached
    let mut terminal: HashMap<ProposalId, ProposalStage> = HashMap::new();

    for _ in 0..config.total_operations {
        report.operations += 1;
        let id = ids[rng.gen_range(0..ids.len())];
        let role = ROLES[rng.gen_range(0..ROLES.len())];
        let action = ACTIONS[rng.gen_range(0..ACTIONS.len())];

        let mut request = ActionRequest::new(id, role, actor_for(role), action);
        if rng.gen_bool(config.comment_probability) {
            request = request.with_comment("simulated decision context");
        }
        if action == WorkflowAction::FunctionalApproveConditional && rng.gen_bool(0.9) {
            request = request.with_conditions(vec!["simulated pre-launch condition".to_string()]);
        }

        let before = match store.load(id) {
            Ok(record) => record,
            Err(err) => {
                report.violations.push(format!("seeded proposal vanished: {err}"));
                break;
            }
        };

        match engine.apply(request) {
            Ok(committed) => {
                report.committed += 1;
                check_committed(&mut report, &before, &committed);
                if committed.stage().is_terminal() {
                    terminal.insert(committed.id, committed.stage());
                }
            }
            Err(
                WorkflowError::InvalidTransition { .. }
                | WorkflowError::MissingRequiredInput(_)
                | WorkflowError::UnknownParty { .. },
            ) => {
                report.rejected += 1;
                // rejected actions must not have mutated anything
                if let Ok(after) = store.load(id) {
                    if after != before {
                        report
                            .violations
                            .push(format!("rejected action mutated proposal {id}"));
                    }
                }
            }
            Err(err) => {
                report
                    .violations
                    .push(format!("unexpected engine error on {id}: {err}"));
            }
        }

        for (tid, stage) in &terminal {
            if let Ok(record) = store.load(*tid) {
                if record.stage() != *stage {
                    report
                        .violations
                        .push(format!("terminal proposal {tid} changed stage"));
                }
            }
        }

        if config.stop_on_first_violation && !report.violations.is_empty() {
            break;
        }
    }

    if let Err(err) = log.verify_integrity() {
        report.violations.push(format!("audit chain broken: {err}"));
    }

    for record in store.list() {
        match record.stage() {
            ProposalStage::Approved => report.approved_proposals += 1,
            ProposalStage::Rejected => report.rejected_proposals += 1,
            _ => {}
        }
    }

    report
}

fn check_committed(report: &mut SimReport, before: &ProposalRecord, after: &ProposalRecord) {
    if after.version() != before.version() + 1 {
        report
            .violations
            .push(format!("version did not advance by one on {}", after.id));
    }
    if after.stage() == ProposalStage::PendingFinalApproval && !after.matrix().all_cleared() {
        report.violations.push(format!(
            "proposal {} reached final approval without all parties cleared",
            after.id
        ));
    }
    if after.stage() == ProposalStage::PendingSignOffs && !after.matrix().is_initialized() {
        report.violations.push(format!(
            "proposal {} is in sign-offs with an uninitialized matrix",
            after.id
        ));
    }
    if after.required_sign_offs() != before.required_sign_offs() {
        report
            .violations
            .push(format!("required sign-off set changed on {}", after.id));
    }
}

fn actor_for(role: UserRole) -> ActorIdentity {
    match role {
        UserRole::Maker => ActorIdentity::new("sim-maker", "Sim Maker"),
        UserRole::Checker => ActorIdentity::new("sim-checker", "Sim Checker"),
        UserRole::Coo => ActorIdentity::new("sim-coo", "Sim COO"),
        approver => ActorIdentity::new(
            format!("sim-{approver}").to_lowercase(),
            format!("Sim {approver}"),
        ),
    }
}

fn random_party_set(rng: &mut StdRng) -> Vec<SignOffParty> {
    let mut parties: Vec<SignOffParty> = SignOffParty::ALL
        .into_iter()
        .filter(|_| rng.gen_bool(0.5))
        .collect();
    if parties.is_empty() {
        parties.push(SignOffParty::ALL[rng.gen_range(0..SignOffParty::ALL.len())]);
    }
    parties
}
