//! Structural schema descriptions and the validation entry point

use crate::error::{SchemaError, SchemaValidationError};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Schema name for claimant registration payloads
pub const CLAIMANT_SCHEMA: &str = "claims.claimant";

/// Schema name for claim submission payloads
pub const CLAIM_SCHEMA: &str = "claims.claim";

/// Schema name for identifier-type configuration records
pub const PERSISTENT_ID_SCHEMA: &str = "claims.persistent_id";

/// Schema name for predicate configuration records
pub const PREDICATE_SCHEMA: &str = "claims.predicate";

/// Expected JSON type of a payload field
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// JSON string
    Text,

    /// JSON number
    Number,

    /// JSON boolean
    Boolean,

    /// Nested object with its own field specs
    Object(Vec<FieldSpec>),
}

/// A single field constraint within a schema
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name as it appears in the payload
    pub name: &'static str,

    /// Expected JSON type
    pub kind: FieldKind,

    /// Whether the field must be present and non-null
    pub required: bool,
}

impl FieldSpec {
    fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// A named structural schema: the full set of field constraints for one
/// payload kind
#[derive(Debug, Clone)]
pub struct Schema {
    /// Dotted schema name (e.g. "claims.claim")
    pub name: &'static str,

    /// Field constraints checked against the payload
    pub fields: Vec<FieldSpec>,
}

/// Registry of structural schemas, keyed by schema name
///
/// Validation collects every violation instead of stopping at the first,
/// so the caller can correct the whole request in one round trip.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Schema>,
}

impl SchemaRegistry {
    /// Create the registry holding every payload schema the engine accepts
    pub fn builtin() -> Self {
        let mut schemas = HashMap::new();

        schemas.insert(
            CLAIMANT_SCHEMA,
            Schema {
                name: CLAIMANT_SCHEMA,
                fields: vec![
                    FieldSpec::required("name", FieldKind::Text),
                    FieldSpec::optional("url", FieldKind::Text),
                ],
            },
        );

        schemas.insert(
            PERSISTENT_ID_SCHEMA,
            Schema {
                name: PERSISTENT_ID_SCHEMA,
                fields: vec![
                    FieldSpec::required("type", FieldKind::Text),
                    FieldSpec::required("description", FieldKind::Text),
                    FieldSpec::optional("url_syntax", FieldKind::Text),
                    FieldSpec::optional("example_value", FieldKind::Text),
                    FieldSpec::optional("example_url", FieldKind::Text),
                ],
            },
        );

        schemas.insert(
            PREDICATE_SCHEMA,
            Schema {
                name: PREDICATE_SCHEMA,
                fields: vec![
                    FieldSpec::required("name", FieldKind::Text),
                    FieldSpec::optional("description", FieldKind::Text),
                ],
            },
        );

        schemas.insert(
            CLAIM_SCHEMA,
            Schema {
                name: CLAIM_SCHEMA,
                fields: vec![
                    FieldSpec::required("claimant", FieldKind::Text),
                    FieldSpec::required(
                        "subject",
                        FieldKind::Object(vec![
                            FieldSpec::required("type", FieldKind::Text),
                            FieldSpec::required("value", FieldKind::Text),
                        ]),
                    ),
                    FieldSpec::required("predicate", FieldKind::Text),
                    FieldSpec::required(
                        "object",
                        FieldKind::Object(vec![
                            FieldSpec::required("type", FieldKind::Text),
                            FieldSpec::required("value", FieldKind::Text),
                        ]),
                    ),
                    FieldSpec::required("certainty", FieldKind::Number),
                    FieldSpec::required("human", FieldKind::Boolean),
                    FieldSpec::required("actor", FieldKind::Text),
                ],
            },
        );

        Self { schemas }
    }

    /// Check whether a schema is registered under the given name
    pub fn contains(&self, schema_name: &str) -> bool {
        self.schemas.contains_key(schema_name)
    }

    /// Validate a payload against a named schema
    ///
    /// # Errors
    /// - `SchemaError::UnknownSchema` when no schema carries the name
    /// - `SchemaError::Validation` carrying every violated constraint
    pub fn validate(&self, payload: &Value, schema_name: &str) -> Result<(), SchemaError> {
        let schema = self
            .schemas
            .get(schema_name)
            .ok_or_else(|| SchemaError::UnknownSchema(schema_name.to_string()))?;

        let mut violations = Vec::new();

        match payload.as_object() {
            Some(fields) => check_fields(fields, &schema.fields, "", &mut violations),
            None => violations.push("payload must be a JSON object".to_string()),
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Validation(SchemaValidationError {
                schema: schema.name.to_string(),
                violations,
            }))
        }
    }
}

fn check_fields(
    fields: &Map<String, Value>,
    specs: &[FieldSpec],
    prefix: &str,
    violations: &mut Vec<String>,
) {
    for spec in specs {
        let path = if prefix.is_empty() {
            spec.name.to_string()
        } else {
            format!("{}.{}", prefix, spec.name)
        };

        match fields.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    violations.push(format!("missing required field `{}`", path));
                }
            }
            Some(value) => check_kind(value, &spec.kind, &path, violations),
        }
    }
}

fn check_kind(value: &Value, kind: &FieldKind, path: &str, violations: &mut Vec<String>) {
    match kind {
        FieldKind::Text => {
            if !value.is_string() {
                violations.push(format!("field `{}` must be a string", path));
            }
        }
        FieldKind::Number => {
            if !value.is_number() {
                violations.push(format!("field `{}` must be a number", path));
            }
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                violations.push(format!("field `{}` must be a boolean", path));
            }
        }
        FieldKind::Object(specs) => match value.as_object() {
            Some(nested) => check_fields(nested, specs, path, violations),
            None => violations.push(format!("field `{}` must be an object", path)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_claim() -> Value {
        json!({
            "claimant": "CDS",
            "subject": {"type": "CDS_RECORD_ID", "value": "2001192"},
            "predicate": "is_variant_of",
            "object": {"type": "CDS_REPORT_NUMBER", "value": "CMS-PAS-HIG-14-008"},
            "certainty": 1.0,
            "human": false,
            "actor": "CDS_submission"
        })
    }

    fn violations(result: Result<(), SchemaError>) -> Vec<String> {
        match result {
            Err(SchemaError::Validation(e)) => e.violations,
            other => panic!("Expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_claim_passes() {
        let schemas = SchemaRegistry::builtin();
        assert!(schemas.validate(&valid_claim(), CLAIM_SCHEMA).is_ok());
    }

    #[test]
    fn test_valid_claimant_passes() {
        let schemas = SchemaRegistry::builtin();
        let payload = json!({"name": "INSPIRE", "url": "http://inspirehep.net"});
        assert!(schemas.validate(&payload, CLAIMANT_SCHEMA).is_ok());

        // url is optional
        let bare = json!({"name": "INSPIRE"});
        assert!(schemas.validate(&bare, CLAIMANT_SCHEMA).is_ok());
    }

    #[test]
    fn test_unknown_schema() {
        let schemas = SchemaRegistry::builtin();
        let result = schemas.validate(&json!({}), "claims.nonexistent");
        assert!(matches!(result, Err(SchemaError::UnknownSchema(_))));
    }

    #[test]
    fn test_missing_required_field() {
        let schemas = SchemaRegistry::builtin();
        let mut payload = valid_claim();
        payload.as_object_mut().unwrap().remove("claimant");

        let violations = violations(schemas.validate(&payload, CLAIM_SCHEMA));
        assert_eq!(violations, vec!["missing required field `claimant`"]);
    }

    #[test]
    fn test_wrong_field_type() {
        let schemas = SchemaRegistry::builtin();
        let mut payload = valid_claim();
        payload["certainty"] = json!("high");

        let violations = violations(schemas.validate(&payload, CLAIM_SCHEMA));
        assert_eq!(violations, vec!["field `certainty` must be a number"]);
    }

    #[test]
    fn test_nested_object_violation_paths() {
        let schemas = SchemaRegistry::builtin();
        let mut payload = valid_claim();
        payload["subject"] = json!({"type": "CDS_RECORD_ID"});
        payload["object"] = json!("not-an-object");

        let violations = violations(schemas.validate(&payload, CLAIM_SCHEMA));
        assert!(violations.contains(&"missing required field `subject.value`".to_string()));
        assert!(violations.contains(&"field `object` must be an object".to_string()));
    }

    #[test]
    fn test_all_violations_collected() {
        let schemas = SchemaRegistry::builtin();
        let payload = json!({"certainty": "high"});

        let violations = violations(schemas.validate(&payload, CLAIM_SCHEMA));
        // claimant, subject, predicate, object, human, actor missing
        // plus the certainty type mismatch
        assert_eq!(violations.len(), 7);
    }

    #[test]
    fn test_null_counts_as_missing() {
        let schemas = SchemaRegistry::builtin();
        let payload = json!({"name": null});

        let violations = violations(schemas.validate(&payload, CLAIMANT_SCHEMA));
        assert_eq!(violations, vec!["missing required field `name`"]);
    }

    #[test]
    fn test_non_object_payload() {
        let schemas = SchemaRegistry::builtin();
        let violations = violations(schemas.validate(&json!([1, 2, 3]), CLAIMANT_SCHEMA));
        assert_eq!(violations, vec!["payload must be a JSON object"]);
    }

    #[test]
    fn test_persistent_id_schema() {
        let schemas = SchemaRegistry::builtin();
        let payload = json!({
            "type": "CDS_RECORD_ID",
            "description": "CDS record identifier",
            "url_syntax": "http://cds.cern.ch/record/<value>"
        });
        assert!(schemas.validate(&payload, PERSISTENT_ID_SCHEMA).is_ok());

        let missing = json!({"type": "CDS_RECORD_ID"});
        let violations = violations(schemas.validate(&missing, PERSISTENT_ID_SCHEMA));
        assert_eq!(violations, vec!["missing required field `description`"]);
    }
}
