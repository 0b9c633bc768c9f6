//! Orchestration domain
//!
//! Operating modes, the analysis phase catalog, and turn outcomes.

pub mod mode;
pub mod phase;
pub mod turn;
