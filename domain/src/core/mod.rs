//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelId`]: chat completion model identifiers
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
