//! idlink Storage Layer
//!
//! Implements the ClaimStore, ClaimantRegistry, and VocabularyRegistry
//! traits over a single SQLite database.
//!
//! # Architecture
//!
//! - One relational store shared by all registries and the claim graph
//! - Referential checks run before the single transactional INSERT, so a
//!   rejected submission leaves no stored side effect
//! - Claimant uniqueness is enforced by the database, not by a
//!   check-then-insert in application code
//!
//! # Examples
//!
//! ```no_run
//! use idlink_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for registry and claim operations
//! ```

#![warn(missing_docs)]

use idlink_domain::traits::{ClaimQuery, ClaimStore, ClaimantRegistry, VocabularyRegistry};
use idlink_domain::{
    Certainty, Claim, ClaimId, Claimant, IdentifierRef, IdentifierType, NewClaim, Predicate,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Claimant name already registered
    #[error("Claimant `{0}` is already registered")]
    DuplicateClaimant(String),

    /// Claim references a claimant that is not registered
    #[error("Unknown claimant: {0}")]
    UnknownClaimant(String),

    /// Claim references an identifier type that is not registered
    #[error("Unknown identifier type: {0}")]
    UnknownIdentifierType(String),

    /// Claim references a predicate that is not registered
    #[error("Unknown predicate: {0}")]
    UnknownPredicate(String),

    /// Certainty outside [0.0, 1.0] or not finite
    #[error("Invalid certainty: {0}")]
    InvalidCertainty(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Whether this error reflects bad client input rather than an
    /// infrastructure failure
    pub fn is_client_error(&self) -> bool {
        !matches!(self, StoreError::Database(_) | StoreError::InvalidData(_))
    }
}

/// SQLite-backed implementation of the registries and the claim store
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a SqliteStore across
/// threads behind a mutex, or give each thread its own instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use idlink_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("idlink.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Total number of stored claims
    pub fn claim_count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM claims", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Convert ClaimId to bytes for storage
    fn claim_id_to_bytes(id: ClaimId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to ClaimId
    fn bytes_to_claim_id(bytes: &[u8]) -> Result<ClaimId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for ClaimId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(ClaimId::from_value(u128::from_be_bytes(arr)))
    }

    /// Map a claims row (column order as in SELECT_CLAIM) to a Claim
    fn row_to_claim(row: &Row<'_>) -> rusqlite::Result<Claim> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_claim_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        Ok(Claim {
            id,
            claimant: row.get(1)?,
            subject: IdentifierRef {
                idtype: row.get(2)?,
                value: row.get(3)?,
            },
            predicate: row.get(4)?,
            object: IdentifierRef {
                idtype: row.get(5)?,
                value: row.get(6)?,
            },
            certainty: row.get(7)?,
            human: row.get(8)?,
            actor: row.get(9)?,
            created_at: row.get::<_, i64>(10)? as u64,
        })
    }
}

const SELECT_CLAIM: &str = "SELECT id, claimant, subject_type, subject_value, predicate, \
     object_type, object_value, certainty, human, actor, created_at FROM claims";

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl VocabularyRegistry for SqliteStore {
    type Error = StoreError;

    fn register_identifier_type(&mut self, idtype: IdentifierType) -> Result<(), Self::Error> {
        // Idempotent: bootstrap config is reloaded at every startup
        self.conn.execute(
            "INSERT OR IGNORE INTO identifier_types \
             (name, description, url_syntax, example_value, example_url) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &idtype.name,
                &idtype.description,
                &idtype.url_syntax,
                &idtype.example_value,
                &idtype.example_url,
            ],
        )?;
        Ok(())
    }

    fn get_identifier_type(&self, name: &str) -> Result<Option<IdentifierType>, Self::Error> {
        let idtype = self
            .conn
            .query_row(
                "SELECT name, description, url_syntax, example_value, example_url \
                 FROM identifier_types WHERE name = ?1",
                params![name],
                |row| {
                    Ok(IdentifierType {
                        name: row.get(0)?,
                        description: row.get(1)?,
                        url_syntax: row.get(2)?,
                        example_value: row.get(3)?,
                        example_url: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(idtype)
    }

    fn list_identifier_types(&self) -> Result<Vec<IdentifierType>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT name, description, url_syntax, example_value, example_url \
             FROM identifier_types ORDER BY name",
        )?;
        let idtypes = stmt
            .query_map([], |row| {
                Ok(IdentifierType {
                    name: row.get(0)?,
                    description: row.get(1)?,
                    url_syntax: row.get(2)?,
                    example_value: row.get(3)?,
                    example_url: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(idtypes)
    }

    fn register_predicate(&mut self, predicate: Predicate) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT OR IGNORE INTO predicates (name, description) VALUES (?1, ?2)",
            params![&predicate.name, &predicate.description],
        )?;
        Ok(())
    }

    fn get_predicate(&self, name: &str) -> Result<Option<Predicate>, Self::Error> {
        let predicate = self
            .conn
            .query_row(
                "SELECT name, description FROM predicates WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Predicate {
                        name: row.get(0)?,
                        description: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(predicate)
    }

    fn list_predicates(&self) -> Result<Vec<Predicate>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, description FROM predicates ORDER BY name")?;
        let predicates = stmt
            .query_map([], |row| {
                Ok(Predicate {
                    name: row.get(0)?,
                    description: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(predicates)
    }
}

impl ClaimantRegistry for SqliteStore {
    type Error = StoreError;

    fn register_claimant(
        &mut self,
        name: &str,
        url: Option<&str>,
    ) -> Result<Claimant, Self::Error> {
        let joined_at = now_millis();

        // The PRIMARY KEY constraint closes the race between two
        // concurrent registrations of the same name.
        let result = self.conn.execute(
            "INSERT INTO claimants (name, url, joined_at) VALUES (?1, ?2, ?3)",
            params![name, url, joined_at as i64],
        );

        match result {
            Ok(_) => Ok(Claimant::new(name, url.map(String::from), joined_at)),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateClaimant(name.to_string()))
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    fn lookup_claimant(&self, name: &str) -> Result<Option<Claimant>, Self::Error> {
        let claimant = self
            .conn
            .query_row(
                "SELECT name, url, joined_at FROM claimants WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Claimant {
                        name: row.get(0)?,
                        url: row.get(1)?,
                        joined_at: row.get::<_, i64>(2)? as u64,
                    })
                },
            )
            .optional()?;
        Ok(claimant)
    }
}

impl ClaimStore for SqliteStore {
    type Error = StoreError;

    fn submit_claim(&mut self, claim: NewClaim) -> Result<Claim, Self::Error> {
        // Referential checks first; the INSERT below is the only mutation.
        if self.lookup_claimant(&claim.claimant)?.is_none() {
            return Err(StoreError::UnknownClaimant(claim.claimant.clone()));
        }

        for idtype in [&claim.subject.idtype, &claim.object.idtype] {
            if !self.identifier_type_exists(idtype)? {
                return Err(StoreError::UnknownIdentifierType(idtype.clone()));
            }
        }

        if !self.predicate_exists(&claim.predicate)? {
            return Err(StoreError::UnknownPredicate(claim.predicate.clone()));
        }

        Certainty::new(claim.certainty).map_err(StoreError::InvalidCertainty)?;

        let stored = claim.into_claim(ClaimId::new(), now_millis());
        let id_bytes = Self::claim_id_to_bytes(stored.id);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO claims (id, claimant, subject_type, subject_value, predicate, \
             object_type, object_value, certainty, human, actor, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                &id_bytes,
                &stored.claimant,
                &stored.subject.idtype,
                &stored.subject.value,
                &stored.predicate,
                &stored.object.idtype,
                &stored.object.value,
                stored.certainty,
                stored.human,
                &stored.actor,
                stored.created_at as i64,
            ],
        )?;
        tx.commit()?;

        Ok(stored)
    }

    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error> {
        let id_bytes = Self::claim_id_to_bytes(id);
        let claim = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_CLAIM),
                params![&id_bytes],
                Self::row_to_claim,
            )
            .optional()?;
        Ok(claim)
    }

    fn query_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, Self::Error> {
        let mut sql = format!("{} WHERE 1=1", SELECT_CLAIM);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(claimant) = &query.claimant {
            sql.push_str(" AND claimant = ?");
            params.push(Box::new(claimant.clone()));
        }

        if let Some(predicate) = &query.predicate {
            sql.push_str(" AND predicate = ?");
            params.push(Box::new(predicate.clone()));
        }

        if let Some(min_certainty) = query.min_certainty {
            sql.push_str(" AND certainty >= ?");
            params.push(Box::new(min_certainty));
        }

        if let Some(human) = query.human {
            sql.push_str(" AND human = ?");
            params.push(Box::new(human));
        }

        if let Some(actor) = &query.actor {
            sql.push_str(" AND actor LIKE ?");
            params.push(Box::new(actor.clone()));
        }

        // The subject-or-object check is an OR internal to one filter;
        // across filters everything stays conjunctive.
        if let Some(idtype) = &query.idtype {
            sql.push_str(" AND (subject_type = ? OR object_type = ?)");
            params.push(Box::new(idtype.clone()));
            params.push(Box::new(idtype.clone()));
        }

        if let Some(value) = &query.value {
            sql.push_str(" AND (subject_value = ? OR object_value = ?)");
            params.push(Box::new(value.clone()));
            params.push(Box::new(value.clone()));
        }

        if let Some(subject) = &query.subject {
            sql.push_str(" AND subject_type = ?");
            params.push(Box::new(subject.clone()));
        }

        if let Some(object) = &query.object {
            sql.push_str(" AND object_type = ?");
            params.push(Box::new(object.clone()));
        }

        sql.push_str(" ORDER BY rowid");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let claims = stmt
            .query_map(&param_refs[..], Self::row_to_claim)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(claims)
    }
}
