//! CLI module graph.

pub mod access;
pub mod approve;
pub mod command;
pub mod diagnostic;
pub mod estimate;
pub mod flow;
pub mod join;
pub mod levels;
pub mod output;
pub mod positions;
pub mod stake;
pub mod status;
