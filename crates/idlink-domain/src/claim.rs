//! Claim module - the fundamental unit of the assertion graph

use std::fmt;

/// Unique identifier for a claim based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability for stable result ordering
/// - 128-bit uniqueness
/// - RFC 9562-standard format with broad ecosystem support
/// - No coordination required between submitting claimants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(u128);

impl ClaimId {
    /// Generate a new UUIDv7-based ClaimId
    ///
    /// # Examples
    ///
    /// ```
    /// use idlink_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a new ClaimId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a ClaimId from a UUIDv7 string
    ///
    /// # Examples
    ///
    /// ```
    /// use idlink_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// let id_str = id.to_string();
    /// let parsed = ClaimId::from_string(&id_str).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUIDv7 string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Get the timestamp component of the UUIDv7 (milliseconds since Unix epoch)
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// One side of a claim: an identifier-type name plus a value in that namespace
///
/// The type name refers to an entry in the identifier-type registry
/// (e.g. "CDS_RECORD_ID"); the value is the identifier itself ("2001192").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierRef {
    /// Name of the identifier type
    pub idtype: String,

    /// Identifier value within that type's namespace
    pub value: String,
}

impl IdentifierRef {
    /// Create an identifier reference
    pub fn new(idtype: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            idtype: idtype.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for IdentifierRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.idtype, self.value)
    }
}

/// A claim - an assertion that two identifiers denote the same or a
/// related real-world entity
///
/// Claims are immutable once stored; there is no update path. The
/// claimant, both identifier types, and the predicate must exist in
/// their registries when the claim is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// Unique identifier, assigned by the store
    pub id: ClaimId,

    /// Name of the owning claimant
    pub claimant: String,

    /// Subject of the claim
    pub subject: IdentifierRef,

    /// Relation between subject and object (e.g. "is_same_as")
    pub predicate: String,

    /// Object of the claim
    pub object: IdentifierRef,

    /// Confidence that the claim is correct, in [0.0, 1.0]
    pub certainty: f64,

    /// Whether a human (vs an automated process) asserted the claim
    pub human: bool,

    /// The specific human or process that asserted the claim
    pub actor: String,

    /// When this claim was stored (milliseconds since Unix epoch)
    pub created_at: u64,
}

/// A claim as submitted, before the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq)]
pub struct NewClaim {
    /// Name of the owning claimant
    pub claimant: String,

    /// Subject of the claim
    pub subject: IdentifierRef,

    /// Relation between subject and object
    pub predicate: String,

    /// Object of the claim
    pub object: IdentifierRef,

    /// Confidence that the claim is correct, in [0.0, 1.0]
    pub certainty: f64,

    /// Whether a human asserted the claim
    pub human: bool,

    /// The specific human or process that asserted the claim
    pub actor: String,
}

impl NewClaim {
    /// Promote a submitted claim to a stored claim
    pub fn into_claim(self, id: ClaimId, created_at: u64) -> Claim {
        Claim {
            id,
            claimant: self.claimant,
            subject: self.subject,
            predicate: self.predicate,
            object: self.object,
            certainty: self.certainty,
            human: self.human,
            actor: self.actor,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_id_ordering() {
        let id1 = ClaimId::from_value(1000);
        let id2 = ClaimId::from_value(2000);

        assert!(id1 < id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_claim_id_chronological() {
        // UUIDv7s generated in sequence should be chronologically ordered
        let id1 = ClaimId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = ClaimId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should be less than later UUIDv7");
        assert!(id1.timestamp() <= id2.timestamp(), "Timestamps should be ordered");
    }

    #[test]
    fn test_claim_id_display_and_parse() {
        let id = ClaimId::new();
        let id_str = id.to_string();

        // UUIDv7 strings are 36 characters (8-4-4-4-12 with hyphens)
        assert_eq!(id_str.len(), 36);

        let parsed = ClaimId::from_string(&id_str).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_claim_id_invalid_string() {
        assert!(ClaimId::from_string("not-a-valid-uuid").is_err());
        assert!(ClaimId::from_string("").is_err());
    }

    #[test]
    fn test_identifier_ref_display() {
        let r = IdentifierRef::new("CDS_RECORD_ID", "2001192");
        assert_eq!(r.to_string(), "CDS_RECORD_ID:2001192");
    }

    #[test]
    fn test_into_claim_preserves_fields() {
        let new_claim = NewClaim {
            claimant: "CDS".to_string(),
            subject: IdentifierRef::new("CDS_RECORD_ID", "2001192"),
            predicate: "is_same_as".to_string(),
            object: IdentifierRef::new("INSPIRE_RECORD_ID", "1297062"),
            certainty: 0.8,
            human: true,
            actor: "John Doe".to_string(),
        };

        let id = ClaimId::new();
        let claim = new_claim.clone().into_claim(id, 1234);

        assert_eq!(claim.id, id);
        assert_eq!(claim.created_at, 1234);
        assert_eq!(claim.claimant, new_claim.claimant);
        assert_eq!(claim.subject, new_claim.subject);
        assert_eq!(claim.predicate, new_claim.predicate);
        assert_eq!(claim.object, new_claim.object);
        assert_eq!(claim.certainty, new_claim.certainty);
        assert_eq!(claim.human, new_claim.human);
        assert_eq!(claim.actor, new_claim.actor);
    }
}
