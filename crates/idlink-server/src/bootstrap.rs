//! Bootstrap loading of the controlled vocabularies.
//!
//! Reads JSON files from `<dir>/pids` and `<dir>/predicates`, validates
//! each against its structural schema, and registers the entries
//! idempotently. A malformed file is logged and skipped so one bad
//! record does not block the rest of the vocabulary from loading.

use idlink_domain::traits::VocabularyRegistry;
use idlink_domain::{IdentifierType, Predicate};
use idlink_schema::{SchemaRegistry, PERSISTENT_ID_SCHEMA, PREDICATE_SCHEMA};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// An identifier-type configuration record (`pids/*.json`)
#[derive(Debug, Deserialize)]
struct PersistentIdRecord {
    #[serde(rename = "type")]
    name: String,
    description: String,
    #[serde(default)]
    url_syntax: Option<String>,
    #[serde(default)]
    example_value: Option<String>,
    #[serde(default)]
    example_url: Option<String>,
}

/// A predicate configuration record (`predicates/*.json`)
#[derive(Debug, Deserialize)]
struct PredicateRecord {
    name: String,
    #[serde(default)]
    description: String,
}

/// Counts from one bootstrap pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Identifier types registered (or re-registered)
    pub identifier_types: usize,

    /// Predicates registered (or re-registered)
    pub predicates: usize,

    /// Files skipped because they failed parsing or validation
    pub skipped: usize,
}

/// Load both vocabularies from a configuration directory
pub fn load_vocabularies<R>(registry: &mut R, schemas: &SchemaRegistry, dir: &Path) -> LoadReport
where
    R: VocabularyRegistry,
    R::Error: Display,
{
    let mut report = LoadReport::default();

    for path in json_files(&dir.join("pids")) {
        match read_record::<PersistentIdRecord>(&path, schemas, PERSISTENT_ID_SCHEMA) {
            Ok(record) => {
                let idtype = IdentifierType {
                    name: record.name,
                    description: record.description,
                    url_syntax: record.url_syntax,
                    example_value: record.example_value,
                    example_url: record.example_url,
                };
                match registry.register_identifier_type(idtype) {
                    Ok(()) => report.identifier_types += 1,
                    Err(e) => {
                        warn!("Could not register identifier type from {}: {}", path.display(), e);
                        report.skipped += 1;
                    }
                }
            }
            Err(reason) => {
                warn!("Skipping {}: {}", path.display(), reason);
                report.skipped += 1;
            }
        }
    }

    for path in json_files(&dir.join("predicates")) {
        match read_record::<PredicateRecord>(&path, schemas, PREDICATE_SCHEMA) {
            Ok(record) => {
                let predicate = Predicate {
                    name: record.name,
                    description: record.description,
                };
                match registry.register_predicate(predicate) {
                    Ok(()) => report.predicates += 1,
                    Err(e) => {
                        warn!("Could not register predicate from {}: {}", path.display(), e);
                        report.skipped += 1;
                    }
                }
            }
            Err(reason) => {
                warn!("Skipping {}: {}", path.display(), reason);
                report.skipped += 1;
            }
        }
    }

    info!(
        "Vocabulary load complete: {} identifier types, {} predicates, {} skipped",
        report.identifier_types, report.predicates, report.skipped
    );

    report
}

/// All `*.json` files directly in a directory, sorted for determinism
fn json_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// Read, validate, and deserialize one configuration record
fn read_record<T: serde::de::DeserializeOwned>(
    path: &Path,
    schemas: &SchemaRegistry,
    schema_name: &str,
) -> Result<T, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| format!("read failed: {}", e))?;
    let value: Value =
        serde_json::from_str(&contents).map_err(|e| format!("invalid JSON: {}", e))?;
    schemas.validate(&value, schema_name).map_err(|e| e.to_string())?;
    serde_json::from_value(value).map_err(|e| format!("deserialization failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlink_store::SqliteStore;
    use std::fs;

    fn write_vocab_dir(dir: &Path) {
        fs::create_dir_all(dir.join("pids")).unwrap();
        fs::create_dir_all(dir.join("predicates")).unwrap();

        fs::write(
            dir.join("pids/cds_record_id.json"),
            r#"{
                "type": "CDS_RECORD_ID",
                "description": "CDS record identifier",
                "url_syntax": "http://cds.cern.ch/record/<value>"
            }"#,
        )
        .unwrap();

        fs::write(
            dir.join("pids/doi.json"),
            r#"{"type": "DOI", "description": "Digital Object Identifier"}"#,
        )
        .unwrap();

        // Missing the required description field
        fs::write(dir.join("pids/broken.json"), r#"{"type": "BROKEN_ID"}"#).unwrap();

        fs::write(
            dir.join("predicates/is_same_as.json"),
            r#"{"name": "is_same_as", "description": "Same entity"}"#,
        )
        .unwrap();

        // Not JSON at all
        fs::write(dir.join("predicates/garbage.json"), "not json {").unwrap();
    }

    #[test]
    fn test_load_vocabularies_skips_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        write_vocab_dir(dir.path());

        let mut store = SqliteStore::new(":memory:").unwrap();
        let schemas = SchemaRegistry::builtin();
        let report = load_vocabularies(&mut store, &schemas, dir.path());

        assert_eq!(report.identifier_types, 2);
        assert_eq!(report.predicates, 1);
        assert_eq!(report.skipped, 2);

        let idtype = store.get_identifier_type("CDS_RECORD_ID").unwrap().unwrap();
        assert_eq!(
            idtype.url_syntax.as_deref(),
            Some("http://cds.cern.ch/record/<value>")
        );
        assert!(store.get_identifier_type("BROKEN_ID").unwrap().is_none());
        assert!(store.get_predicate("is_same_as").unwrap().is_some());
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_vocab_dir(dir.path());

        let mut store = SqliteStore::new(":memory:").unwrap();
        let schemas = SchemaRegistry::builtin();
        load_vocabularies(&mut store, &schemas, dir.path());
        load_vocabularies(&mut store, &schemas, dir.path());

        assert_eq!(store.list_identifier_types().unwrap().len(), 2);
        assert_eq!(store.list_predicates().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_directories_load_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = SqliteStore::new(":memory:").unwrap();
        let schemas = SchemaRegistry::builtin();
        let report = load_vocabularies(&mut store, &schemas, dir.path());

        assert_eq!(report, LoadReport::default());
    }
}
