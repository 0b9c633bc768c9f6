//! Use cases (application services)
//!
//! Use cases orchestrate domain logic and coordinate with ports.

pub mod build_context;
pub mod chat_session;
pub mod run_turn;
