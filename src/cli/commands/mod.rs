//! CLI command implementations

pub mod check;
pub mod init;
pub mod next_phase;
pub mod transitions;
