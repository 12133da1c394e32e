//! idlink Schema Validator
//!
//! Validates inbound payloads against explicit structural schemas before
//! any registry lookup or store mutation is attempted. A payload that
//! fails here must never reach persistence logic.
//!
//! Schemas are keyed by dotted name, matching the configuration files
//! they validate (e.g. `claims.persistent_id`).
//!
//! # Examples
//!
//! ```
//! use idlink_schema::{SchemaRegistry, CLAIMANT_SCHEMA};
//! use serde_json::json;
//!
//! let schemas = SchemaRegistry::builtin();
//! let payload = json!({"name": "CDS", "url": "http://cds.cern.ch"});
//! assert!(schemas.validate(&payload, CLAIMANT_SCHEMA).is_ok());
//! ```

#![warn(missing_docs)]

mod error;
mod registry;

pub use error::{SchemaError, SchemaValidationError};
pub use registry::{
    FieldKind, FieldSpec, Schema, SchemaRegistry, CLAIMANT_SCHEMA, CLAIM_SCHEMA,
    PERSISTENT_ID_SCHEMA, PREDICATE_SCHEMA,
};
