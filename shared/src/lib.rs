//! Shared types for the learning portal
//!
//! Contains the domain vocabulary used by every component: identifiers,
//! roles, entity records and the read models returned to clients.
//! Storage and transport concerns are kept in their respective components.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
