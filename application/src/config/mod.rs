//! Application-level configuration.
//!
//! Parameters that control how use cases behave: round limits, sampling,
//! history window and deadlines.

pub mod execution_params;

pub use execution_params::ExecutionParams;
