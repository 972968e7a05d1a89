//! Error taxonomy for principal resolution and role reconciliation.
//!
//! Collaborator errors ([`DirectoryError`], [`WorkspaceError`]) are kept
//! separate from the crate-level [`Error`] so that callers of the resolver
//! never have to match on directory-specific kinds.

use std::fmt;

use thiserror::Error;

/// Errors surfaced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Neither the directory nor syntactic classification could determine
    /// what kind of principal an identifier names.
    #[error("Unable to resolve principal '{identifier}': {reason}")]
    UnresolvableIdentifier {
        /// The identifier as requested.
        identifier: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The directory service was reachable but rejected the lookup.
    #[error(transparent)]
    DirectoryLookup(#[from] DirectoryLookupError),

    /// The workspace service rejected a role-assignment call.
    #[error(transparent)]
    WorkspaceApi(#[from] WorkspaceApiError),

    /// A collaborator could not be constructed.
    #[error(transparent)]
    TransportUnavailable(#[from] TransportUnavailable),

    /// Reconciliation options failed validation.
    #[error("invalid reconcile options: {0}")]
    InvalidOptions(String),
}

impl Error {
    /// Creates an [`Error::UnresolvableIdentifier`].
    pub fn unresolvable(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnresolvableIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}

/// Why a directory lookup was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryLookupKind {
    /// No principal matches the identifier.
    NotFound,
    /// More than one principal matches the identifier.
    Ambiguous,
    /// The directory reported a transient failure.
    Transient,
}

impl fmt::Display for DirectoryLookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryLookupKind::NotFound => write!(f, "not found"),
            DirectoryLookupKind::Ambiguous => write!(f, "ambiguous"),
            DirectoryLookupKind::Transient => write!(f, "transient"),
        }
    }
}

/// A lookup error returned by a reachable directory service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("directory lookup failed ({kind}): {message}")]
pub struct DirectoryLookupError {
    /// The category of failure.
    pub kind: DirectoryLookupKind,
    /// Detail reported by the directory.
    pub message: String,
}

impl DirectoryLookupError {
    /// Creates a new lookup error.
    pub fn new(kind: DirectoryLookupKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Failure modes of [`DirectoryService::resolve_principal`](crate::DirectoryService::resolve_principal).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The directory answered and said no.
    #[error(transparent)]
    Lookup(#[from] DirectoryLookupError),

    /// Anything else went wrong on the directory path (network, auth, decoding).
    ///
    /// The resolver answers this by falling back to syntactic classification.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// A rejected workspace API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("workspace API error ({status_code}): {message}")]
pub struct WorkspaceApiError {
    /// HTTP status code returned by the workspace API.
    pub status_code: u16,
    /// Body or reason phrase returned with the status.
    pub message: String,
}

impl WorkspaceApiError {
    /// Creates a new API error.
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    /// Returns an actionable hint for the status code.
    pub fn hint(&self) -> &'static str {
        match self.status_code {
            400 => "Verify the identifier is correct and the principal exists",
            403 => "Ensure you have Admin permissions on this workspace",
            404 => "Check if the principal exists in your directory tenant",
            _ => "Check API permissions and principal validity",
        }
    }
}

/// Failure modes of the workspace collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    /// The API answered with an error status.
    #[error(transparent)]
    Api(#[from] WorkspaceApiError),

    /// Any other failure (transport, decoding).
    #[error("{0}")]
    Other(String),
}

/// A collaborator client could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{service} client unavailable: {message}")]
pub struct TransportUnavailable {
    /// Which collaborator failed, e.g. `"directory"`.
    pub service: &'static str,
    /// Why construction failed.
    pub message: String,
}

impl TransportUnavailable {
    /// Creates a new construction failure for `service`.
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}
