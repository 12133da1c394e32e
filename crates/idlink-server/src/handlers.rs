//! HTTP request handlers for the claim service.
//!
//! Implements claimant subscription, claim submission, and the filtered
//! claim search endpoints using axum. Every payload passes the schema
//! validator before any registry or store call.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use idlink_domain::traits::{ClaimQuery, ClaimStore, ClaimantRegistry, VocabularyRegistry};
use idlink_domain::{Claim, Claimant, IdentifierRef, IdentifierType, NewClaim, Predicate};
use idlink_schema::{SchemaError, SchemaRegistry, CLAIMANT_SCHEMA, CLAIM_SCHEMA};
use idlink_store::{SqliteStore, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The single relational store behind all registries
    pub store: Arc<Mutex<SqliteStore>>,
    /// Structural schemas for inbound payloads
    pub schemas: Arc<SchemaRegistry>,
}

/// One side of a claim as it appears on the wire
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentifierRefBody {
    /// Identifier-type name
    #[serde(rename = "type")]
    pub idtype: String,
    /// Identifier value
    pub value: String,
}

impl From<IdentifierRef> for IdentifierRefBody {
    fn from(r: IdentifierRef) -> Self {
        Self {
            idtype: r.idtype,
            value: r.value,
        }
    }
}

/// Claimant subscription request
#[derive(Debug, Deserialize)]
pub struct ClaimantRequest {
    /// Unique claimant name
    pub name: String,
    /// Contact URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Claimant as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimantBody {
    /// Unique claimant name
    pub name: String,
    /// Contact URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Registration time (milliseconds since Unix epoch)
    pub joined_at: u64,
}

impl From<Claimant> for ClaimantBody {
    fn from(c: Claimant) -> Self {
        Self {
            name: c.name,
            url: c.url,
            joined_at: c.joined_at,
        }
    }
}

/// Claim submission request
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    /// Name of the submitting claimant
    pub claimant: String,
    /// Subject identifier
    pub subject: IdentifierRefBody,
    /// Relation between subject and object
    pub predicate: String,
    /// Object identifier
    pub object: IdentifierRefBody,
    /// Confidence in [0.0, 1.0]
    pub certainty: f64,
    /// Whether a human asserted the claim
    pub human: bool,
    /// The specific human or process that asserted the claim
    pub actor: String,
}

impl From<ClaimRequest> for NewClaim {
    fn from(r: ClaimRequest) -> Self {
        NewClaim {
            claimant: r.claimant,
            subject: IdentifierRef::new(r.subject.idtype, r.subject.value),
            predicate: r.predicate,
            object: IdentifierRef::new(r.object.idtype, r.object.value),
            certainty: r.certainty,
            human: r.human,
            actor: r.actor,
        }
    }
}

/// Claim as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimBody {
    /// Server-assigned claim id (UUIDv7)
    pub id: String,
    /// Name of the owning claimant
    pub claimant: String,
    /// Subject identifier
    pub subject: IdentifierRefBody,
    /// Relation between subject and object
    pub predicate: String,
    /// Object identifier
    pub object: IdentifierRefBody,
    /// Confidence in [0.0, 1.0]
    pub certainty: f64,
    /// Whether a human asserted the claim
    pub human: bool,
    /// The specific human or process that asserted the claim
    pub actor: String,
    /// Insertion time (milliseconds since Unix epoch)
    pub created_at: u64,
}

impl From<Claim> for ClaimBody {
    fn from(c: Claim) -> Self {
        Self {
            id: c.id.to_string(),
            claimant: c.claimant,
            subject: c.subject.into(),
            predicate: c.predicate,
            object: c.object.into(),
            certainty: c.certainty,
            human: c.human,
            actor: c.actor,
            created_at: c.created_at,
        }
    }
}

/// Identifier type as returned by the listing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentifierTypeBody {
    /// Unique type name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// URL template with a `<value>` placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_syntax: Option<String>,
    /// Example identifier value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_value: Option<String>,
    /// Example canonical URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_url: Option<String>,
}

impl From<IdentifierType> for IdentifierTypeBody {
    fn from(t: IdentifierType) -> Self {
        Self {
            name: t.name,
            description: t.description,
            url_syntax: t.url_syntax,
            example_value: t.example_value,
            example_url: t.example_url,
        }
    }
}

/// Predicate as returned by the listing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PredicateBody {
    /// Unique predicate name
    pub name: String,
    /// Human-readable description
    pub description: String,
}

impl From<Predicate> for PredicateBody {
    fn from(p: Predicate) -> Self {
        Self {
            name: p.name,
            description: p.description,
        }
    }
}

/// Claim search query parameters; all independently optional
#[derive(Debug, Default, Deserialize)]
pub struct ClaimsParams {
    /// Claimant name (exact, case-sensitive)
    pub claimant: Option<String>,
    /// Predicate name
    pub predicate: Option<String>,
    /// Minimum certainty (inclusive threshold)
    pub certainty: Option<f64>,
    /// Human flag, encoded as "0" or "1"
    pub human: Option<String>,
    /// Actor LIKE pattern (`%` as multi-character wildcard)
    pub actor: Option<String>,
    /// Identifier-type name, matched against either side
    #[serde(rename = "type")]
    pub idtype: Option<String>,
    /// Identifier value, matched against either side
    pub value: Option<String>,
    /// Subject identifier-type name
    pub subject: Option<String>,
    /// Object identifier-type name
    pub object: Option<String>,
}

impl ClaimsParams {
    fn into_query(self) -> Result<ClaimQuery, AppError> {
        let human = match self.human.as_deref() {
            None => None,
            Some("0") => Some(false),
            Some("1") => Some(true),
            Some(other) => {
                return Err(AppError::InvalidFilter(format!(
                    "human filter must be 0 or 1, got `{}`",
                    other
                )))
            }
        };

        Ok(ClaimQuery {
            claimant: self.claimant,
            predicate: self.predicate,
            min_certainty: self.certainty,
            human,
            actor: self.actor,
            idtype: self.idtype,
            value: self.value,
            subject: self.subject,
            object: self.object,
            limit: None,
        })
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Payload failed structural validation
    Schema(SchemaError),
    /// Storage-layer error (client-input or infrastructure)
    Store(StoreError),
    /// Unparseable query parameter
    InvalidFilter(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Schema(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Store(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::InvalidFilter(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<SchemaError> for AppError {
    fn from(e: SchemaError) -> Self {
        AppError::Schema(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

/// POST /subscribe - Register a new claimant
///
/// Duplicate registration is a client error, not a silent success.
async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<ClaimantBody>, AppError> {
    state.schemas.validate(&payload, CLAIMANT_SCHEMA)?;
    let request: ClaimantRequest = serde_json::from_value(payload)
        .map_err(|e| AppError::Internal(format!("claimant payload deserialization: {}", e)))?;

    let mut store = state.store.lock().unwrap();
    let claimant = store.register_claimant(&request.name, request.url.as_deref())?;

    Ok(Json(ClaimantBody::from(claimant)))
}

/// POST /claims - Submit a claim
async fn submit_claim(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<ClaimBody>, AppError> {
    state.schemas.validate(&payload, CLAIM_SCHEMA)?;
    let request: ClaimRequest = serde_json::from_value(payload)
        .map_err(|e| AppError::Internal(format!("claim payload deserialization: {}", e)))?;

    let mut store = state.store.lock().unwrap();
    let claim = store.submit_claim(request.into())?;

    Ok(Json(ClaimBody::from(claim)))
}

/// GET /claims - Search claims with conjunctive filters
async fn list_claims(
    State(state): State<AppState>,
    Query(params): Query<ClaimsParams>,
) -> Result<Json<Vec<ClaimBody>>, AppError> {
    let query = params.into_query()?;

    let store = state.store.lock().unwrap();
    let claims = store.query_claims(&query)?;

    Ok(Json(claims.into_iter().map(ClaimBody::from).collect()))
}

/// GET /identifiers - Enumerate the identifier-type vocabulary
async fn list_identifiers(
    State(state): State<AppState>,
) -> Result<Json<Vec<IdentifierTypeBody>>, AppError> {
    let store = state.store.lock().unwrap();
    let idtypes = store.list_identifier_types()?;

    Ok(Json(idtypes.into_iter().map(IdentifierTypeBody::from).collect()))
}

/// GET /predicates - Enumerate the predicate vocabulary
async fn list_predicates(
    State(state): State<AppState>,
) -> Result<Json<Vec<PredicateBody>>, AppError> {
    let store = state.store.lock().unwrap();
    let predicates = store.list_predicates()?;

    Ok(Json(predicates.into_iter().map(PredicateBody::from).collect()))
}

/// Create the axum router with all routes configured
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/subscribe", post(subscribe))
        .route("/claims", post(submit_claim).get(list_claims))
        .route("/identifiers", get(list_identifiers))
        .route("/predicates", get(list_predicates))
        .with_state(state)
}
