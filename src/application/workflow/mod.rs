//! Token allowance + stake workflow.

pub mod coordinator;
pub mod state;

pub use coordinator::{StakeWorkflow, WorkflowConfig, WorkflowPorts};
pub use state::{WorkflowSnapshot, WorkflowState};
