//! Claimant - a registered contributing system

/// A system registered to submit claims (e.g. "CDS", "INSPIRE")
///
/// Names are unique and compared case-sensitively. Registering an
/// already-registered name is a client error, not a silent success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claimant {
    /// Unique claimant name
    pub name: String,

    /// Contact URL for the claimant system
    pub url: Option<String>,

    /// When the claimant registered (milliseconds since Unix epoch)
    pub joined_at: u64,
}

impl Claimant {
    /// Create a claimant record
    pub fn new(name: impl Into<String>, url: Option<String>, joined_at: u64) -> Self {
        Self {
            name: name.into(),
            url,
            joined_at,
        }
    }
}
