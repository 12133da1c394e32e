//! Trait definitions for the storage seams
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. The SQLite implementations live in idlink-store.

use crate::{Claim, ClaimId, Claimant, IdentifierType, NewClaim, Predicate};

/// Trait for the claim write and read paths
///
/// Submission enforces referential integrity: the claimant, both
/// identifier types, and the predicate must already be registered, and
/// the certainty must be a finite value in [0.0, 1.0]. A rejected
/// submission stores nothing.
pub trait ClaimStore {
    /// Error type for store operations
    type Error;

    /// Validate and persist a claim, assigning its id and creation time
    fn submit_claim(&mut self, claim: NewClaim) -> Result<Claim, Self::Error>;

    /// Get a claim by ID
    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error>;

    /// Query claims matching criteria; all filters combine with AND
    fn query_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, Self::Error>;
}

/// Trait for claimant registration and lookup
///
/// Unlike the vocabulary registries, re-registering an existing claimant
/// name is an error: duplicate registration usually means a caller bug
/// and must surface.
pub trait ClaimantRegistry {
    /// Error type for registry operations
    type Error;

    /// Register a new claimant; fails if the name is already taken
    fn register_claimant(&mut self, name: &str, url: Option<&str>)
        -> Result<Claimant, Self::Error>;

    /// Look up a claimant by exact, case-sensitive name
    fn lookup_claimant(&self, name: &str) -> Result<Option<Claimant>, Self::Error>;
}

/// Trait for the identifier-type and predicate vocabularies
///
/// Registration is append-only and idempotent so bootstrap configuration
/// can be reloaded at every startup.
pub trait VocabularyRegistry {
    /// Error type for registry operations
    type Error;

    /// Register an identifier type; a no-op if the name already exists
    fn register_identifier_type(&mut self, idtype: IdentifierType) -> Result<(), Self::Error>;

    /// Look up an identifier type by name
    fn get_identifier_type(&self, name: &str) -> Result<Option<IdentifierType>, Self::Error>;

    /// Check whether an identifier type is registered
    fn identifier_type_exists(&self, name: &str) -> Result<bool, Self::Error> {
        Ok(self.get_identifier_type(name)?.is_some())
    }

    /// Enumerate the full identifier-type vocabulary
    fn list_identifier_types(&self) -> Result<Vec<IdentifierType>, Self::Error>;

    /// Register a predicate; a no-op if the name already exists
    fn register_predicate(&mut self, predicate: Predicate) -> Result<(), Self::Error>;

    /// Look up a predicate by name
    fn get_predicate(&self, name: &str) -> Result<Option<Predicate>, Self::Error>;

    /// Check whether a predicate is registered
    fn predicate_exists(&self, name: &str) -> Result<bool, Self::Error> {
        Ok(self.get_predicate(name)?.is_some())
    }

    /// Enumerate the full predicate vocabulary
    fn list_predicates(&self) -> Result<Vec<Predicate>, Self::Error>;
}

/// Query criteria for retrieving claims
///
/// Every filter is independently optional; an empty query matches every
/// stored claim. Supplied filters combine with logical AND.
#[derive(Debug, Clone, Default)]
pub struct ClaimQuery {
    /// Filter by claimant name (exact, case-sensitive)
    pub claimant: Option<String>,

    /// Filter by predicate name
    pub predicate: Option<String>,

    /// Filter by minimum certainty (inclusive threshold, not equality)
    pub min_certainty: Option<f64>,

    /// Filter by the human/automated provenance flag
    pub human: Option<bool>,

    /// Filter by actor, SQL LIKE pattern (`%` as multi-character wildcard)
    pub actor: Option<String>,

    /// Match claims whose subject OR object identifier type equals this name
    pub idtype: Option<String>,

    /// Match claims whose subject OR object value equals this value
    pub value: Option<String>,

    /// Match on the subject's identifier type only
    pub subject: Option<String>,

    /// Match on the object's identifier type only
    pub object: Option<String>,

    /// Maximum results to return
    pub limit: Option<usize>,
}
