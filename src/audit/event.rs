//! Audit event schema.

use std::fmt;

use crate::principal::PrincipalKind;

/// The step an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    /// The identifier was resolved to a principal.
    Resolved,
    /// Resolution fell back from the directory to syntactic classification.
    FellBack,
    /// The identifier already held the admin role.
    Skipped,
    /// An add-role-assignment call is about to be made.
    GrantAttempt,
    /// The identifier was granted admin.
    Added,
    /// A step failed.
    Failed,
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEventKind::Resolved => write!(f, "resolved"),
            AuditEventKind::FellBack => write!(f, "fell_back"),
            AuditEventKind::Skipped => write!(f, "skipped"),
            AuditEventKind::GrantAttempt => write!(f, "grant_attempt"),
            AuditEventKind::Added => write!(f, "added"),
            AuditEventKind::Failed => write!(f, "failed"),
        }
    }
}

/// A single step taken for one requested identifier.
///
/// # Example
///
/// ```
/// use admin_reconcile::audit::{AuditEvent, AuditEventKind};
/// use admin_reconcile::PrincipalKind;
///
/// let event = AuditEvent::new(
///     "user@contoso.com",
///     AuditEventKind::GrantAttempt,
///     Some(PrincipalKind::User),
/// );
///
/// assert_eq!(event.identifier(), "user@contoso.com");
/// assert_eq!(event.principal_kind(), Some(PrincipalKind::User));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    identifier: String,
    kind: AuditEventKind,
    principal_kind: Option<PrincipalKind>,
    detail: Option<String>,
}

impl AuditEvent {
    /// Creates an event for `identifier`.
    pub fn new(
        identifier: impl Into<String>,
        kind: AuditEventKind,
        principal_kind: Option<PrincipalKind>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            principal_kind,
            detail: None,
        }
    }

    /// Attaches detail text. Empty text is ignored.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if !detail.is_empty() {
            self.detail = Some(detail);
        }
        self
    }

    /// Returns the requested identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the step kind.
    pub fn kind(&self) -> AuditEventKind {
        self.kind
    }

    /// Returns the principal kind involved, if any.
    pub fn principal_kind(&self) -> Option<PrincipalKind> {
        self.principal_kind
    }

    /// Returns the detail text, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuditEvent[kind={}, identifier={}", self.kind, self.identifier)?;
        if let Some(kind) = self.principal_kind {
            write!(f, ", principal_kind={}", kind)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, ", detail={}", detail)?;
        }
        write!(f, "]")
    }
}
