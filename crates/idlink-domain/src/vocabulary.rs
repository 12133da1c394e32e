//! Controlled vocabularies referenced by claims
//!
//! Identifier types and predicates are immutable reference data: created
//! at bootstrap time, looked up by name on every claim submission, never
//! deleted while claims reference them.

/// A kind of identifier a claim subject or object may use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierType {
    /// Unique type name (e.g. "CDS_RECORD_ID")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// URL template with a `<value>` placeholder
    pub url_syntax: Option<String>,

    /// Example identifier value
    pub example_value: Option<String>,

    /// Example canonical URL
    pub example_url: Option<String>,
}

impl IdentifierType {
    /// Produce the canonical URL for a value, when a template is declared
    ///
    /// # Examples
    ///
    /// ```
    /// use idlink_domain::IdentifierType;
    ///
    /// let idtype = IdentifierType {
    ///     name: "CDS_RECORD_ID".to_string(),
    ///     description: "CDS record identifier".to_string(),
    ///     url_syntax: Some("http://cds.cern.ch/record/<value>".to_string()),
    ///     example_value: None,
    ///     example_url: None,
    /// };
    /// assert_eq!(
    ///     idtype.canonical_url("2001192").unwrap(),
    ///     "http://cds.cern.ch/record/2001192"
    /// );
    /// ```
    pub fn canonical_url(&self, value: &str) -> Option<String> {
        self.url_syntax
            .as_ref()
            .map(|syntax| syntax.replace("<value>", value))
    }
}

/// A relation kind connecting subject and object (e.g. "is_same_as")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Unique predicate name
    pub name: String,

    /// Human-readable description
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cds_record_id() -> IdentifierType {
        IdentifierType {
            name: "CDS_RECORD_ID".to_string(),
            description: "CDS record identifier".to_string(),
            url_syntax: Some("http://cds.cern.ch/record/<value>".to_string()),
            example_value: Some("2001192".to_string()),
            example_url: Some("http://cds.cern.ch/record/2001192".to_string()),
        }
    }

    #[test]
    fn test_canonical_url_substitution() {
        let idtype = cds_record_id();
        assert_eq!(
            idtype.canonical_url("123").unwrap(),
            "http://cds.cern.ch/record/123"
        );
    }

    #[test]
    fn test_canonical_url_without_template() {
        let mut idtype = cds_record_id();
        idtype.url_syntax = None;
        assert!(idtype.canonical_url("123").is_none());
    }
}
