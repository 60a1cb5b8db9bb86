use std::fmt;

use thiserror::Error as ThisError;

/// Errors surfaced by identity resolution, the project service and the REST layer.
#[derive(Debug, ThisError)]
pub enum Error {
    /// No usable security context, missing capability or empty principal.
    #[error("not authenticated: {0}")]
    NotAuthenticated(Violation),

    /// The caller is authenticated but lacks the permission for the operation.
    #[error("forbidden: {0}")]
    Forbidden(Violation),

    /// A required request parameter or payload field is absent or empty.
    #[error("required field '{field}' is not set")]
    RequiredFieldMissing {
        /// Name of the missing field
        field: String,
    },

    /// A payload field disagrees with the value supplied in the request path.
    #[error("field '{field}' must be '{expected}' but was '{actual}'")]
    FieldMismatch {
        /// Name of the mismatching field
        field: String,
        /// Value the field must carry
        expected: String,
        /// Value actually found in the payload
        actual: String,
    },

    /// The requested entity does not exist.
    #[error("entity '{id}' not found")]
    NotFound {
        /// Identifier that was looked up
        id: String,
    },

    /// Failure reported by the entity store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Failure reported by the search index.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Failure reported by the contributor profile lookup.
    #[error(transparent)]
    ProfileLookup(#[from] ProfileError),

    /// Invalid configuration input.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A response body could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for an unauthenticated failure.
    pub fn not_authenticated(message: impl Into<String>) -> Self {
        Error::NotAuthenticated(Violation::new(ViolationKind::Unauthenticated, message))
    }

    /// Shorthand for a missing required field.
    pub fn required_field(field: impl Into<String>) -> Self {
        Error::RequiredFieldMissing {
            field: field.into(),
        }
    }

    /// Returns `true` for errors caused by caller input rather than by a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::RequiredFieldMissing { .. } | Error::FieldMismatch { .. }
        )
    }

    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::RequiredFieldMissing { .. } | Error::FieldMismatch { .. } => 400,
            Error::NotAuthenticated(_) => 401,
            Error::Forbidden(_) => 403,
            Error::NotFound { .. } => 404,
            Error::Store(e) if e.kind() == StoreErrorKind::NotFound => 404,
            Error::Store(_)
            | Error::Index(_)
            | Error::ProfileLookup(_)
            | Error::Config(_)
            | Error::Serialization(_) => 500,
        }
    }
}

/// An authentication or authorization violation with details about what failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Violation {}

/// The kind of violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Authentication is required but missing
    Unauthenticated,
    /// Authorization failed for a specific action
    Unauthorized {
        /// The action that was not authorized
        action: &'static str,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Unauthenticated => write!(f, "Unauthenticated"),
            ViolationKind::Unauthorized { action } => write!(f, "Unauthorized for '{}'", action),
        }
    }
}

/// Error returned by an [`EntityStore`](crate::EntityStore).
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("store error ({kind}): {message}")]
pub struct StoreError {
    kind: StoreErrorKind,
    message: String,
}

impl StoreError {
    /// Creates a new store error.
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The entity addressed by `id` does not exist.
    pub fn not_found(id: &str) -> Self {
        Self::new(StoreErrorKind::NotFound, format!("no entity with id '{}'", id))
    }

    /// Returns the error kind.
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Kind of store error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The addressed entity does not exist.
    NotFound,
    /// The backing storage failed.
    Backend,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Backend => write!(f, "backend failure"),
        }
    }
}

/// Error returned by a [`SearchIndex`](crate::SearchIndex).
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("index error on {index}/{index_type}/{id}: {message}")]
pub struct IndexError {
    index: String,
    index_type: String,
    id: String,
    message: String,
}

impl IndexError {
    /// Creates a new index error for the addressed document.
    pub fn new(
        index: impl Into<String>,
        index_type: impl Into<String>,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            index_type: index_type.into(),
            id: id.into(),
            message: message.into(),
        }
    }

    /// Returns the id of the document the failed operation addressed.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error returned by a [`ContributorProfileService`](crate::ContributorProfileService).
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("contributor profile error: {message}")]
pub struct ProfileError {
    message: String,
}

impl ProfileError {
    /// Creates a new profile error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
