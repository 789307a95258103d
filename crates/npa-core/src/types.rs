//! Identifiers, roles, parties and stages.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique proposal identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub Uuid);

impl ProposalId {
    /// Generate a new proposal ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProposalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProposalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An authenticated actor as resolved by the upstream auth layer.
///
/// The workflow never authenticates; it only authorizes by role and
/// matches maker-owned views against this identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    pub id: String,
    pub display_name: String,
}

impl ActorIdentity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Workbench roles. A role is not a user account; several actors may
/// hold the same role at different times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Maker,
    Checker,
    ApproverRisk,
    ApproverMarket,
    ApproverFinance,
    ApproverTax,
    ApproverLegal,
    ApproverOps,
    ApproverTech,
    Coo,
}

impl UserRole {
    /// True for the functional-approver roles that represent a sign-off party
    #[inline]
    #[must_use]
    pub fn is_functional_approver(self) -> bool {
        matches!(
            self,
            UserRole::ApproverRisk
                | UserRole::ApproverMarket
                | UserRole::ApproverFinance
                | UserRole::ApproverTax
                | UserRole::ApproverLegal
                | UserRole::ApproverOps
                | UserRole::ApproverTech
        )
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UserRole::Maker => "MAKER",
            UserRole::Checker => "CHECKER",
            UserRole::ApproverRisk => "APPROVER_RISK",
            UserRole::ApproverMarket => "APPROVER_MARKET",
            UserRole::ApproverFinance => "APPROVER_FINANCE",
            UserRole::ApproverTax => "APPROVER_TAX",
            UserRole::ApproverLegal => "APPROVER_LEGAL",
            UserRole::ApproverOps => "APPROVER_OPS",
            UserRole::ApproverTech => "APPROVER_TECH",
            UserRole::Coo => "COO",
        };
        f.write_str(name)
    }
}

/// One required approving function. Fixed set per deployment; ordering
/// is the canonical matrix display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SignOffParty {
    RmgCredit,
    RmgMarket,
    GroupFinance,
    GroupTax,
    LegalCompliance,
    TnoOps,
    TnoTech,
}

impl SignOffParty {
    /// All parties in canonical order
    pub const ALL: [SignOffParty; 7] = [
        SignOffParty::RmgCredit,
        SignOffParty::RmgMarket,
        SignOffParty::GroupFinance,
        SignOffParty::GroupTax,
        SignOffParty::LegalCompliance,
        SignOffParty::TnoOps,
        SignOffParty::TnoTech,
    ];

    /// Deployment label shown in the sign-off matrix
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SignOffParty::RmgCredit => "RMG-Credit",
            SignOffParty::RmgMarket => "RMG-Market",
            SignOffParty::GroupFinance => "Group Finance",
            SignOffParty::GroupTax => "Group Tax",
            SignOffParty::LegalCompliance => "Legal & Compliance",
            SignOffParty::TnoOps => "T&O-Ops",
            SignOffParty::TnoTech => "T&O-Tech",
        }
    }
}

impl std::fmt::Display for SignOffParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate workflow stage of a proposal.
///
/// Controlled field: always kept consistent with the sign-off matrix
/// by the engine. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStage {
    Draft,
    PendingChecker,
    PendingSignOffs,
    ReturnedToMaker,
    PendingFinalApproval,
    Approved,
    Rejected,
}

impl ProposalStage {
    /// Terminal stages admit no further transitions
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ProposalStage::Approved | ProposalStage::Rejected)
    }
}

impl std::fmt::Display for ProposalStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProposalStage::Draft => "DRAFT",
            ProposalStage::PendingChecker => "PENDING_CHECKER",
            ProposalStage::PendingSignOffs => "PENDING_SIGN_OFFS",
            ProposalStage::ReturnedToMaker => "RETURNED_TO_MAKER",
            ProposalStage::PendingFinalApproval => "PENDING_FINAL_APPROVAL",
            ProposalStage::Approved => "APPROVED",
            ProposalStage::Rejected => "REJECTED",
        };
        f.write_str(name)
    }
}
