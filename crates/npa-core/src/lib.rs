//! NPA Core - domain model for the New Product Approval workflow
//!
//! Defines the data the workflow engine operates on:
//! - Roles and the fixed set of sign-off parties
//! - Per-party decisions and the sign-off matrix
//! - The proposal aggregate and its stage
//!
//! This crate carries no transition logic. All mutation of a
//! [`ProposalRecord`] happens through the engine in `npa_kernel`;
//! the types here only enforce structural invariants (the required
//! sign-off set is fixed at construction, matrix entries can be
//! updated but never added or removed by callers).

pub mod decision;
pub mod matrix;
pub mod record;
pub mod types;

pub use decision::{SignOffDecision, SignOffStatus};
pub use matrix::SignOffMatrix;
pub use record::ProposalRecord;
pub use types::{ActorIdentity, ProposalId, ProposalStage, SignOffParty, UserRole};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the NPA domain model
    pub use crate::{
        ActorIdentity, ProposalId, ProposalRecord, ProposalStage, SignOffDecision, SignOffMatrix,
        SignOffParty, SignOffStatus, UserRole,
    };
}
