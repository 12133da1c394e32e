//! idlink Domain Layer
//!
//! This crate contains the core business logic and domain model for idlink.
//! It has no infrastructure dependencies and defines the fundamental
//! concepts, value objects, and trait interfaces that all other layers
//! depend upon.
//!
//! ## Key Concepts
//!
//! - **Claim**: an assertion that a subject identifier relates to an object
//!   identifier through a controlled-vocabulary predicate
//! - **Claimant**: the registered system that submits claims
//! - **Identifier Type / Predicate**: controlled vocabularies referenced,
//!   never owned, by claims
//! - **Certainty**: confidence score in [0.0, 1.0] attached to every claim
//! - **Provenance**: every claim records whether a human or an automated
//!   process asserted it, and names the actor
//!
//! ## Architecture
//!
//! - Pure domain logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all storage seams

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod certainty;
pub mod claim;
pub mod claimant;
pub mod traits;
pub mod vocabulary;

// Re-exports for convenience
pub use certainty::Certainty;
pub use claim::{Claim, ClaimId, IdentifierRef, NewClaim};
pub use claimant::Claimant;
pub use traits::ClaimQuery;
pub use vocabulary::{IdentifierType, Predicate};
