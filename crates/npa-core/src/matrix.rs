//! The sign-off matrix: required party -> decision.

use crate::decision::{SignOffDecision, SignOffStatus};
use crate::types::SignOffParty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from required sign-off party to that party's decision.
///
/// The key set is controlled: entries are created by
/// [`SignOffMatrix::initialize`] from the proposal's required sign-off
/// list and can never be added or removed afterwards, only updated in
/// place. A reclassification creates a new matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOffMatrix {
    entries: BTreeMap<SignOffParty, SignOffDecision>,
}

impl SignOffMatrix {
    /// Empty matrix, as carried by a proposal still in draft
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending entry for every party that has none yet.
    ///
    /// Idempotent: entries that already exist (from a previous pass
    /// through checker review) are left untouched.
    pub fn initialize(&mut self, parties: &[SignOffParty]) {
        for party in parties {
            self.entries
                .entry(*party)
                .or_insert_with(SignOffDecision::pending);
        }
    }

    /// True once the matrix has been initialized for at least one party
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        !self.entries.is_empty()
    }

    /// All entries approved or conditionally approved.
    ///
    /// An uninitialized matrix is never cleared; completion checks
    /// must not fire before checker approval creates the entries.
    #[must_use]
    pub fn all_cleared(&self) -> bool {
        self.is_initialized()
            && self.entries.values().all(|d| d.status.is_cleared())
    }

    /// Reset every `ReworkRequired` entry to `Pending`.
    ///
    /// Idempotent; no-op when nothing is in rework. Cleared entries
    /// survive the loop untouched.
    pub fn reset_rework_entries(&mut self) {
        for decision in self.entries.values_mut() {
            decision.reset_if_rework();
        }
    }

    /// Decision for one party, if that party is required
    #[must_use]
    pub fn decision(&self, party: SignOffParty) -> Option<&SignOffDecision> {
        self.entries.get(&party)
    }

    /// Mutable decision for an existing entry.
    ///
    /// Returns `None` for parties outside the required set; callers
    /// cannot use this to grow the matrix.
    pub fn decision_mut(&mut self, party: SignOffParty) -> Option<&mut SignOffDecision> {
        self.entries.get_mut(&party)
    }

    /// Current status for one party
    #[must_use]
    pub fn status(&self, party: SignOffParty) -> Option<SignOffStatus> {
        self.entries.get(&party).map(|d| d.status)
    }

    /// Iterate entries in canonical party order
    pub fn iter(&self) -> impl Iterator<Item = (SignOffParty, &SignOffDecision)> {
        self.entries.iter().map(|(p, d)| (*p, d))
    }

    /// Number of required entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before initialization
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest loop-back count across all parties
    #[must_use]
    pub fn max_loop_back_count(&self) -> u32 {
        self.entries
            .values()
            .map(|d| d.loop_back_count)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn parties() -> Vec<SignOffParty> {
        vec![SignOffParty::RmgCredit, SignOffParty::LegalCompliance]
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut matrix = SignOffMatrix::new();
        matrix.initialize(&parties());
        matrix
            .decision_mut(SignOffParty::RmgCredit)
            .unwrap()
            .approve("David Lee", None, Vec::new(), Utc::now());

        matrix.initialize(&parties());
        assert_eq!(
            matrix.status(SignOffParty::RmgCredit),
            Some(SignOffStatus::Approved)
        );
        assert_eq!(matrix.len(), 2);
    }

    #[test]
    fn empty_matrix_is_not_cleared() {
        assert!(!SignOffMatrix::new().all_cleared());
    }

    #[test]
    fn all_cleared_counts_conditional_approvals() {
        let mut matrix = SignOffMatrix::new();
        matrix.initialize(&parties());
        let now = Utc::now();
        matrix
            .decision_mut(SignOffParty::RmgCredit)
            .unwrap()
            .approve("David Lee", None, Vec::new(), now);
        assert!(!matrix.all_cleared());

        matrix.decision_mut(SignOffParty::LegalCompliance).unwrap().approve(
            "James Tan",
            None,
            vec!["Update clause 3 before launch".to_string()],
            now,
        );
        assert!(matrix.all_cleared());
        assert_eq!(
            matrix.status(SignOffParty::LegalCompliance),
            Some(SignOffStatus::ApprovedConditional)
        );
    }

    #[test]
    fn reset_rework_keeps_comment_and_counter() {
        let mut matrix = SignOffMatrix::new();
        matrix.initialize(&parties());
        matrix
            .decision_mut(SignOffParty::LegalCompliance)
            .unwrap()
            .request_rework("James Tan", "Fix clause 3", Utc::now());

        matrix.reset_rework_entries();
        let decision = matrix.decision(SignOffParty::LegalCompliance).unwrap();
        assert_eq!(decision.status, SignOffStatus::Pending);
        assert_eq!(decision.comment.as_deref(), Some("Fix clause 3"));
        assert_eq!(decision.loop_back_count, 1);

        // no-op when nothing is in rework
        let before = matrix.clone();
        matrix.reset_rework_entries();
        assert_eq!(matrix, before);
    }
}
