//! The workflow engine: validates and applies actor-initiated
//! transitions against proposal records.
//!
//! One call to [`WorkflowEngine::apply`] is one atomic transition:
//! load, authorize, validate, mutate, commit. Validation happens
//! entirely before any mutation, so a failed action leaves the stored
//! record untouched. Concurrent writers are serialized by the store's
//! version check; the engine retries a conflicted transition exactly
//! once against the reloaded state.

use chrono::Utc;
use npa_core::{ProposalRecord, ProposalStage};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::{ActionRequest, ProposalStore, WorkflowAction};
use crate::audit::{EventId, TransitionEvent, TransitionLog};
use crate::error::{StoreError, WorkflowError};
use crate::roles::RoleResolver;
use crate::state_machine;

/// Engine tunables
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Loop-back count at which a rework trips the circuit breaker
    /// and the committed event is flagged for escalation
    pub loop_back_escalation_threshold: u32,
    /// Silent retries on a version conflict before surfacing it
    pub max_conflict_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            loop_back_escalation_threshold: 3,
            max_conflict_retries: 1,
        }
    }
}

/// Owns all writes to proposal records
pub struct WorkflowEngine {
    config: EngineConfig,
    store: Arc<dyn ProposalStore>,
    log: Arc<TransitionLog>,
    resolver: RoleResolver,
}

impl WorkflowEngine {
    /// Engine with default configuration
    pub fn new(store: Arc<dyn ProposalStore>, log: Arc<TransitionLog>) -> Self {
        Self::with_config(store, log, EngineConfig::default())
    }

    /// Engine with custom configuration
    pub fn with_config(
        store: Arc<dyn ProposalStore>,
        log: Arc<TransitionLog>,
        config: EngineConfig,
    ) -> Self {
        Self {
            config,
            store,
            log,
            resolver: RoleResolver::new(),
        }
    }

    /// The store this engine writes through
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ProposalStore> {
        &self.store
    }

    /// The audit log transitions are appended to
    #[must_use]
    pub fn audit_log(&self) -> &Arc<TransitionLog> {
        &self.log
    }

    /// Apply one actor action and return the committed record.
    ///
    /// On a version conflict the transition is re-applied once against
    /// the reloaded record; if the precondition no longer holds after
    /// the reload the caller gets `InvalidTransition` (the state
    /// changed underneath them).
    pub fn apply(&self, request: ActionRequest) -> Result<ProposalRecord, WorkflowError> {
        let mut attempts = 0;
        loop {
            let record = match self.store.load(request.proposal_id) {
                Ok(record) => record,
                Err(StoreError::NotFound(id)) => return Err(WorkflowError::NotFound(id)),
                Err(_) => return Err(WorkflowError::Conflict(request.proposal_id)),
            };
            let from_stage = record.stage();
            let (updated, escalated) = self.transition(record, &request)?;
            let to_stage = updated.stage();

            match self.store.save(updated.clone()) {
                Ok(()) => {
                    self.emit(&request, from_stage, to_stage, escalated);
                    info!(
                        proposal = %request.proposal_id,
                        action = %request.action,
                        actor = %request.actor_role,
                        from = %from_stage,
                        to = %to_stage,
                        "transition committed"
                    );
                    return Ok(updated);
                }
                Err(StoreError::VersionConflict { .. })
                    if attempts < self.config.max_conflict_retries =>
                {
                    attempts += 1;
                    debug!(
                        proposal = %request.proposal_id,
                        action = %request.action,
                        attempt = attempts,
                        "version conflict, retrying against reloaded state"
                    );
                }
                Err(StoreError::VersionConflict { id, .. }) => {
                    return Err(WorkflowError::Conflict(id));
                }
                Err(StoreError::NotFound(id)) => return Err(WorkflowError::NotFound(id)),
                Err(StoreError::Duplicate(id)) => return Err(WorkflowError::Conflict(id)),
            }
        }
    }

    /// Authorize and apply `request` to an owned copy of the record.
    ///
    /// Pure with respect to the store: all failures return before any
    /// field of `record` is written.
    fn transition(
        &self,
        mut record: ProposalRecord,
        request: &ActionRequest,
    ) -> Result<(ProposalRecord, bool), WorkflowError> {
        self.resolver
            .can_act(request.actor_role, &record, request.action)?;

        let from_stage = record.stage();
        let now = Utc::now();
        let mut escalated = false;

        match request.action {
            WorkflowAction::Submit => {
                if record.title.trim().is_empty() || record.description.trim().is_empty() {
                    return Err(WorkflowError::MissingRequiredInput(
                        "title and description are required before submission".to_string(),
                    ));
                }
                match from_stage {
                    ProposalStage::Draft => record.set_stage(ProposalStage::PendingChecker),
                    ProposalStage::ReturnedToMaker => {
                        record.matrix_mut().reset_rework_entries();
                        // a return before checker approval re-enters checker
                        // review; a rework loop re-enters the sign-off phase
                        let next = if record.matrix().is_initialized() {
                            ProposalStage::PendingSignOffs
                        } else {
                            ProposalStage::PendingChecker
                        };
                        record.set_stage(next);
                    }
                    stage => {
                        return Err(WorkflowError::InvalidTransition {
                            action: request.action,
                            stage,
                        })
                    }
                }
            }
            WorkflowAction::CheckerApprove => {
                record.initialize_matrix();
                record.set_stage(ProposalStage::PendingSignOffs);
            }
            WorkflowAction::CheckerReturn => {
                require_comment(request, "a reason is required to return to maker")?;
                record.set_stage(ProposalStage::ReturnedToMaker);
            }
            WorkflowAction::CheckerReject => {
                record.set_stage(ProposalStage::Rejected);
            }
            WorkflowAction::FunctionalApprove | WorkflowAction::FunctionalApproveConditional => {
                let party = self
                    .resolver
                    .party_for_role(request.actor_role)
                    .ok_or(WorkflowError::UnknownParty {
                        role: request.actor_role,
                    })?;
                let conditions = if request.action
                    == WorkflowAction::FunctionalApproveConditional
                {
                    if request.conditions.iter().all(|c| c.trim().is_empty()) {
                        return Err(WorkflowError::MissingRequiredInput(
                            "conditional approval requires at least one condition".to_string(),
                        ));
                    }
                    request.conditions.clone()
                } else {
                    Vec::new()
                };
                let decision = record.matrix_mut().decision_mut(party).ok_or(
                    WorkflowError::InvalidTransition {
                        action: request.action,
                        stage: from_stage,
                    },
                )?;
                decision.approve(
                    request.actor.display_name.clone(),
                    request.comment.clone(),
                    conditions,
                    now,
                );
                // completion check: advance only when every required
                // party has cleared
                if record.matrix().all_cleared() {
                    record.set_stage(ProposalStage::PendingFinalApproval);
                }
            }
            WorkflowAction::FunctionalRework => {
                let comment =
                    require_comment(request, "a rework request requires a comment")?;
                let party = self
                    .resolver
                    .party_for_role(request.actor_role)
                    .ok_or(WorkflowError::UnknownParty {
                        role: request.actor_role,
                    })?;
                let decision = record.matrix_mut().decision_mut(party).ok_or(
                    WorkflowError::InvalidTransition {
                        action: request.action,
                        stage: from_stage,
                    },
                )?;
                decision.request_rework(request.actor.display_name.clone(), comment, now);
                // rework routes the whole proposal back immediately,
                // regardless of other parties' recorded decisions
                record.set_stage(ProposalStage::ReturnedToMaker);

                let loop_backs = record.matrix().max_loop_back_count();
                if loop_backs >= self.config.loop_back_escalation_threshold {
                    escalated = true;
                    warn!(
                        proposal = %record.id,
                        party = %party,
                        loop_backs,
                        threshold = self.config.loop_back_escalation_threshold,
                        "loop-back circuit breaker tripped"
                    );
                }
            }
            WorkflowAction::FinalApprove => {
                record.set_stage(ProposalStage::Approved);
                record.final_approver = Some(request.actor.display_name.clone());
                record.final_approval_date = Some(now);
            }
            WorkflowAction::FinalReject => {
                require_comment(request, "a reason is required for rejection")?;
                record.set_stage(ProposalStage::Rejected);
            }
        }

        if record.stage() != from_stage {
            state_machine::validate_transition(from_stage, record.stage(), request.action)?;
        }
        record.commit(now);
        Ok((record, escalated))
    }

    fn emit(
        &self,
        request: &ActionRequest,
        from_stage: ProposalStage,
        to_stage: ProposalStage,
        escalated: bool,
    ) {
        self.log.append(TransitionEvent {
            event_id: EventId::new(),
            proposal_id: request.proposal_id,
            action: request.action,
            actor_role: request.actor_role,
            actor_name: request.actor.display_name.clone(),
            from_stage,
            to_stage,
            comment: request.comment.clone(),
            escalated,
            timestamp: Utc::now(),
            prev_hash: [0u8; 32],
            hash: [0u8; 32],
        });
    }
}

fn require_comment(
    request: &ActionRequest,
    message: &str,
) -> Result<String, WorkflowError> {
    match request.comment.as_deref().map(str::trim) {
        Some(comment) if !comment.is_empty() => Ok(comment.to_string()),
        _ => Err(WorkflowError::MissingRequiredInput(message.to_string())),
    }
}
