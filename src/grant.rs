//! Applying admin grants.
//!
//! Two modes:
//! - [`GrantApplier::apply_resolved`] issues exactly one call for a
//!   principal whose kind is known.
//! - [`GrantApplier::apply_by_object_id`] probes a bare object ID as each
//!   kind in turn until one is accepted.
//!
//! Neither mode checks the existing-grant index; that is the caller's job.
//! Neither mode returns an error: every failure becomes a
//! [`GrantStatus::Failed`] outcome.

use std::fmt;

use serde::Serialize;

use crate::audit::{AuditEvent, AuditEventKind, AuditTrail};
use crate::error::{Error, WorkspaceError};
use crate::logging::RunLog;
use crate::principal::{PrincipalKind, ResolvedPrincipal};
use crate::workspace::{AddRoleAssignment, WorkspaceService};

/// Final status of one requested identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GrantStatus {
    /// A new admin assignment was created.
    Added,
    /// The principal already held the admin role.
    Skipped,
    /// The grant could not be made.
    Failed,
}

impl fmt::Display for GrantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantStatus::Added => write!(f, "added"),
            GrantStatus::Skipped => write!(f, "skipped"),
            GrantStatus::Failed => write!(f, "failed"),
        }
    }
}

/// What happened to one requested identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantOutcome {
    /// The status.
    pub status: GrantStatus,
    /// Human-readable detail; for failures, enough to diagnose alone.
    pub detail: String,
    /// The kind the principal was granted as, for added outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_as: Option<PrincipalKind>,
}

impl GrantOutcome {
    /// An added outcome.
    pub fn added(kind: PrincipalKind, detail: impl Into<String>) -> Self {
        Self {
            status: GrantStatus::Added,
            detail: detail.into(),
            granted_as: Some(kind),
        }
    }

    /// A skipped outcome.
    pub fn skipped(detail: impl Into<String>) -> Self {
        Self {
            status: GrantStatus::Skipped,
            detail: detail.into(),
            granted_as: None,
        }
    }

    /// A failed outcome.
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            status: GrantStatus::Failed,
            detail: detail.into(),
            granted_as: None,
        }
    }

    /// The outcome for an identifier whose kind could not be detected.
    pub fn detection_failed(err: &Error) -> Self {
        Self::failed(format!("Principal type detection failed: {err}"))
    }

    /// The outcome for a rejected or broken add call.
    pub fn from_workspace_error(err: &WorkspaceError) -> Self {
        match err {
            WorkspaceError::Api(api) => Self::failed(format!(
                "API error ({}): {}",
                api.status_code,
                api.hint()
            )),
            WorkspaceError::Other(message) => Self::failed(format!("Unexpected error: {message}")),
        }
    }

    /// Returns `true` for [`GrantStatus::Added`].
    pub fn is_added(&self) -> bool {
        self.status == GrantStatus::Added
    }
}

/// Issues admin grants against one workspace.
pub struct GrantApplier<'a, W: WorkspaceService + ?Sized> {
    workspace: &'a W,
    probe_order: &'a [PrincipalKind],
    audit: Option<&'a AuditTrail>,
}

impl<'a, W: WorkspaceService + ?Sized> GrantApplier<'a, W> {
    /// Creates an applier that probes in the default order.
    pub fn new(workspace: &'a W) -> Self {
        Self {
            workspace,
            probe_order: &PrincipalKind::ALL,
            audit: None,
        }
    }

    /// Overrides the probing order.
    pub fn with_probe_order(mut self, order: &'a [PrincipalKind]) -> Self {
        self.probe_order = order;
        self
    }

    /// Records grant attempts into `trail`.
    pub fn with_audit(mut self, trail: &'a AuditTrail) -> Self {
        self.audit = Some(trail);
        self
    }

    /// Grants admin to a resolved principal with a single call.
    pub fn apply_resolved(&self, principal: &ResolvedPrincipal, requested: &str) -> GrantOutcome {
        let log = RunLog::new(self.workspace.workspace_id());
        let request = AddRoleAssignment::for_principal(principal, requested);

        log.info(format_args!(
            "Adding {} administrator: {} ({})",
            principal.kind(),
            requested,
            principal.display_name()
        ));
        self.record(requested, AuditEventKind::GrantAttempt, Some(principal.kind()), "");

        match self.workspace.add_role_assignment(&request) {
            Ok(()) => {
                log.info(format_args!(
                    "Successfully added '{}' as workspace administrator",
                    requested
                ));
                GrantOutcome::added(principal.kind(), "Added successfully")
            }
            Err(err) => {
                log.warn(format_args!("Failed to add '{}': {}", requested, err));
                GrantOutcome::from_workspace_error(&err)
            }
        }
    }

    /// Grants admin to a bare object ID by trying each kind in turn.
    ///
    /// Stops at the first kind the workspace accepts. Per-kind failures are
    /// logged and do not end the loop.
    pub fn apply_by_object_id(&self, object_id: &str) -> GrantOutcome {
        let log = RunLog::new(self.workspace.workspace_id());
        log.info(format_args!(
            "Adding administrator by object ID: {}",
            object_id
        ));

        for &kind in self.probe_order {
            log.debug(format_args!("Trying '{}' as {}", object_id, kind));
            self.record(object_id, AuditEventKind::GrantAttempt, Some(kind), "");

            match self
                .workspace
                .add_role_assignment(&AddRoleAssignment::new(object_id, kind))
            {
                Ok(()) => {
                    log.info(format_args!(
                        "Successfully added '{}' as workspace administrator ({})",
                        object_id, kind
                    ));
                    return GrantOutcome::added(kind, format!("Added successfully as {kind}"));
                }
                Err(err) => {
                    log.warn(format_args!("Failed as {}: {}", kind, err));
                    self.record(
                        object_id,
                        AuditEventKind::Failed,
                        Some(kind),
                        &err.to_string(),
                    );
                }
            }
        }

        let tried = self
            .probe_order
            .iter()
            .map(PrincipalKind::as_str)
            .collect::<Vec<_>>()
            .join(" and ");
        GrantOutcome::failed(format!("Failed to add as both {tried} types"))
    }

    fn record(
        &self,
        identifier: &str,
        kind: AuditEventKind,
        principal_kind: Option<PrincipalKind>,
        detail: &str,
    ) {
        if let Some(trail) = self.audit {
            trail.record(AuditEvent::new(identifier, kind, principal_kind).with_detail(detail));
        }
    }
}
