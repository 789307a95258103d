//! NPA Workflow Kernel
//!
//! The multi-party sign-off engine for New Product Approval proposals:
//! maker submission, checker review, N parallel functional sign-offs,
//! rework loop-backs and final executive approval.
//!
//! All proposal mutation goes through [`WorkflowEngine::apply`]; reads
//! for the role-scoped work queues go through [`InboxProjector`]. Every
//! committed transition is appended to the hash-chained
//! [`TransitionLog`].

pub mod audit;
pub mod engine;
pub mod projector;
pub mod roles;
pub mod sim;
pub mod state_machine;
pub mod store;

pub mod api;
pub mod error;

pub use api::{ActionRequest, ProposalStore, WorkflowAction};
pub use audit::{TransitionEvent, TransitionLog};
pub use engine::{EngineConfig, WorkflowEngine};
pub use error::{StoreError, WorkflowError};
pub use projector::{InboxProjector, WorkItemView};
pub use roles::RoleResolver;
pub use store::MemoryStore;

/// Re-export the simulator for external harnesses
pub use sim::{run_simulator, SimReport, SimulatorConfig};
