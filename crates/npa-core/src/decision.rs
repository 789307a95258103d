//! Per-party sign-off decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of one party's decision on a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignOffStatus {
    Pending,
    Approved,
    ApprovedConditional,
    ReworkRequired,
    Rejected,
}

impl SignOffStatus {
    /// True once this party no longer blocks completion
    #[inline]
    #[must_use]
    pub fn is_cleared(self) -> bool {
        matches!(
            self,
            SignOffStatus::Approved | SignOffStatus::ApprovedConditional
        )
    }

    /// True while this party may still act on the proposal
    #[inline]
    #[must_use]
    pub fn is_actionable(self) -> bool {
        matches!(
            self,
            SignOffStatus::Pending | SignOffStatus::ReworkRequired
        )
    }
}

impl std::fmt::Display for SignOffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SignOffStatus::Pending => "PENDING",
            SignOffStatus::Approved => "APPROVED",
            SignOffStatus::ApprovedConditional => "APPROVED_CONDITIONAL",
            SignOffStatus::ReworkRequired => "REWORK_REQUIRED",
            SignOffStatus::Rejected => "REJECTED",
        };
        f.write_str(name)
    }
}

/// One party's decision record.
///
/// A decision survives rework loops: the comment stays for audit and
/// `loop_back_count` only ever grows. Only the engine resets a
/// `ReworkRequired` status back to `Pending` on resubmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOffDecision {
    pub status: SignOffStatus,
    /// Context for the decision; mandatory for rework requests
    pub comment: Option<String>,
    pub approver_name: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    /// Pre-launch conditions imposed by a conditional approval
    pub conditions: Vec<String>,
    /// Number of times this party has sent the proposal back
    pub loop_back_count: u32,
}

impl SignOffDecision {
    /// Fresh pending decision, as created at matrix initialization
    #[must_use]
    pub fn pending() -> Self {
        Self {
            status: SignOffStatus::Pending,
            comment: None,
            approver_name: None,
            decided_at: None,
            conditions: Vec::new(),
            loop_back_count: 0,
        }
    }

    /// Record an approval by `approver` at `now`.
    ///
    /// A non-empty `conditions` list makes this a conditional approval.
    pub fn approve(
        &mut self,
        approver: impl Into<String>,
        comment: Option<String>,
        conditions: Vec<String>,
        now: DateTime<Utc>,
    ) {
        self.status = if conditions.is_empty() {
            SignOffStatus::Approved
        } else {
            SignOffStatus::ApprovedConditional
        };
        self.approver_name = Some(approver.into());
        self.comment = comment;
        self.conditions = conditions;
        self.decided_at = Some(now);
    }

    /// Record a rework request and bump the loop-back counter
    pub fn request_rework(
        &mut self,
        approver: impl Into<String>,
        comment: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.status = SignOffStatus::ReworkRequired;
        self.approver_name = Some(approver.into());
        self.comment = Some(comment.into());
        self.decided_at = Some(now);
        self.loop_back_count += 1;
    }

    /// Reset a rework entry to pending on maker resubmission.
    ///
    /// The comment is retained for audit and the loop-back counter is
    /// untouched. No-op for any other status.
    pub fn reset_if_rework(&mut self) {
        if self.status == SignOffStatus::ReworkRequired {
            self.status = SignOffStatus::Pending;
            self.approver_name = None;
            self.decided_at = None;
        }
    }
}

impl Default for SignOffDecision {
    fn default() -> Self {
        Self::pending()
    }
}
