//! Read-side projection of role-scoped work queues.
//!
//! Never mutates state and never caches: every call recomputes the
//! view from the current store snapshot, so a committed transition is
//! visible to the next projection immediately.

use npa_core::{ProposalRecord, ProposalStage, UserRole};
use std::sync::Arc;

use crate::api::ProposalStore;
use crate::roles::RoleResolver;

/// The three work-queue views of the workbench
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkItemView {
    /// Items requiring this actor's attention right now
    Inbox,
    /// The maker's unsubmitted drafts
    Drafts,
    /// Items this actor is tracking but need not act on
    Watchlist,
}

/// Computes `(role, view)` projections over the proposal store
pub struct InboxProjector {
    store: Arc<dyn ProposalStore>,
    resolver: RoleResolver,
}

impl InboxProjector {
    pub fn new(store: Arc<dyn ProposalStore>) -> Self {
        Self {
            store,
            resolver: RoleResolver::new(),
        }
    }

    /// Proposals visible to `(role, actor, view)`, most recently
    /// updated first (id as tie-break).
    ///
    /// `actor_id` scopes the maker views to that maker's own
    /// proposals; it is ignored for role-wide queues.
    #[must_use]
    pub fn project(
        &self,
        role: UserRole,
        actor_id: &str,
        view: WorkItemView,
    ) -> Vec<ProposalRecord> {
        let mut items: Vec<ProposalRecord> = self
            .store
            .list()
            .into_iter()
            .filter(|record| self.visible(role, actor_id, view, record))
            .collect();
        items.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }

    fn visible(
        &self,
        role: UserRole,
        actor_id: &str,
        view: WorkItemView,
        record: &ProposalRecord,
    ) -> bool {
        let own = record.submitted_by.id == actor_id;
        match (view, role) {
            (WorkItemView::Inbox, UserRole::Maker) => {
                own && record.stage() == ProposalStage::ReturnedToMaker
            }
            (WorkItemView::Inbox, UserRole::Checker) => {
                record.stage() == ProposalStage::PendingChecker
            }
            (WorkItemView::Inbox, UserRole::Coo) => {
                record.stage() == ProposalStage::PendingFinalApproval
            }
            (WorkItemView::Inbox, approver) if approver.is_functional_approver() => {
                let Some(party) = self.resolver.party_for_role(approver) else {
                    return false;
                };
                record.stage() == ProposalStage::PendingSignOffs
                    && record.requires(party)
                    && record
                        .matrix()
                        .status(party)
                        .is_some_and(|s| s.is_actionable())
            }
            (WorkItemView::Drafts, UserRole::Maker) => {
                own && record.stage() == ProposalStage::Draft
            }
            (WorkItemView::Watchlist, UserRole::Maker) => {
                own && !matches!(
                    record.stage(),
                    ProposalStage::Draft | ProposalStage::ReturnedToMaker
                )
            }
            (WorkItemView::Watchlist, approver) if approver.is_functional_approver() => {
                let Some(party) = self.resolver.party_for_role(approver) else {
                    return false;
                };
                record.requires(party)
                    && record
                        .matrix()
                        .status(party)
                        .is_some_and(|s| s.is_cleared())
            }
            _ => false,
        }
    }
}
