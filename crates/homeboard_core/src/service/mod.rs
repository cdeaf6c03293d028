//! Use-case services orchestrating repositories, mapping and patching.
//!
//! # Responsibility
//! - Expose list/get/create/update/patch/delete use-cases over DTOs.
//! - Keep boundary layers decoupled from storage and merge details.
//!
//! # Invariants
//! - Not-found is a result (`None`/`false`), never an error, at this layer.
//! - All other failure kinds propagate upward unchanged for the boundary to
//!   translate.

use crate::model::content::{ContentId, ContentValidationError};
use crate::patch::PatchError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod card_service;
pub mod carousel_service;

/// Service-level error taxonomy shared by the card and carousel services.
#[derive(Debug)]
pub enum ServiceError {
    /// Non-positive id rejected before any storage access.
    InvalidId(ContentId),
    /// Payload failed entity validation; nothing was persisted.
    Validation(ContentValidationError),
    /// Malformed or inapplicable edit operation; nothing was persisted.
    InvalidPatch(PatchError),
    /// Payload or patched DTO carries an id that contradicts the route id.
    /// The route id is the single source of truth for identity.
    IdentityMismatch {
        route_id: ContentId,
        payload_id: ContentId,
    },
    /// The write lost a race against a concurrent caller; safe to retry.
    Conflict,
    /// Internal mismatch between a write and its read-back projection.
    InconsistentState(&'static str),
    /// Storage-engine failure propagated from the repository.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(id) => write!(f, "invalid content id: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidPatch(err) => write!(f, "{err}"),
            Self::IdentityMismatch {
                route_id,
                payload_id,
            } => write!(
                f,
                "payload id {payload_id} contradicts route id {route_id}"
            ),
            Self::Conflict => write!(f, "write conflicted with a concurrent caller"),
            Self::InconsistentState(details) => write!(f, "inconsistent content state: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidPatch(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::InvalidId(id) => Self::InvalidId(id),
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Conflict => Self::Conflict,
            other => Self::Repo(other),
        }
    }
}

impl From<PatchError> for ServiceError {
    fn from(value: PatchError) -> Self {
        Self::InvalidPatch(value)
    }
}
