//! Application services (use cases).
//!
//! Pure state machines for each workflow stage, the coordinator that drives
//! them against the ports, and the session shared by every live instance.

pub mod allowance;
pub mod estimate;
pub mod join;
pub mod machine;
pub mod session;
pub mod stake;
pub mod staked;
pub mod workflow;

pub use estimate::TransactionTimeEstimator;
pub use session::{IdentityBound, Session};
pub use staked::StakedReader;
pub use workflow::{StakeWorkflow, WorkflowConfig, WorkflowPorts, WorkflowSnapshot, WorkflowState};
