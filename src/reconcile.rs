//! Batch reconciliation of requested administrators.
//!
//! A run is a sequential fold over the requested identifiers with one owned
//! [`ExistingGrantIndex`] threaded through it:
//!
//! ```text
//! snapshot index (once)
//!   -> phase A: resolve-then-grant identifiers, in order
//!   -> phase B: object-ID-only identifiers, in order
//!   -> aggregate into BatchResult
//! ```
//!
//! Each identifier ends as added, skipped or failed. No identifier's failure
//! stops the batch.

use std::fmt;

use serde::Serialize;

use crate::audit::{AuditEvent, AuditEventKind, AuditTrail};
use crate::config::ReconcileOptions;
use crate::directory::DirectoryConnector;
use crate::error::Error;
use crate::grant::{GrantApplier, GrantOutcome, GrantStatus};
use crate::index::ExistingGrantIndex;
use crate::logging::RunLog;
use crate::request::AdminRequest;
use crate::resolver::{PrincipalResolver, ResolveStrategy};
use crate::workspace::WorkspaceService;

/// Batch-level verdict derived from a [`BatchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchStatus {
    /// No identifiers were requested.
    NothingRequested,
    /// At least one identifier was added or skipped.
    Progressed,
    /// Every identifier failed.
    AllFailed,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::NothingRequested => write!(f, "nothing requested"),
            BatchStatus::Progressed => write!(f, "progressed"),
            BatchStatus::AllFailed => write!(f, "all failed"),
        }
    }
}

/// Aggregate result of one reconciliation run.
///
/// `errors` holds one `"<identifier>: <detail>"` entry per failed
/// identifier, in the order they were processed. It is never truncated;
/// use [`errors_preview`](Self::errors_preview) for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Identifiers newly granted admin.
    pub added: usize,
    /// Identifiers that already held admin.
    pub skipped: usize,
    /// Identifiers that could not be granted.
    pub failed: usize,
    /// Failure details, in encounter order.
    pub errors: Vec<String>,
}

impl BatchResult {
    /// Tallies one identifier's outcome.
    pub fn record(&mut self, identifier: &str, outcome: &GrantOutcome) {
        match outcome.status {
            GrantStatus::Added => self.added += 1,
            GrantStatus::Skipped => self.skipped += 1,
            GrantStatus::Failed => {
                self.failed += 1;
                self.errors.push(format!("{identifier}: {}", outcome.detail));
            }
        }
    }

    /// Returns the number of identifiers processed.
    pub fn total(&self) -> usize {
        self.added + self.skipped + self.failed
    }

    /// Returns the batch-level verdict.
    ///
    /// Partial failure still counts as progress.
    pub fn status(&self) -> BatchStatus {
        if self.added > 0 || self.skipped > 0 {
            BatchStatus::Progressed
        } else if self.failed > 0 {
            BatchStatus::AllFailed
        } else {
            BatchStatus::NothingRequested
        }
    }

    /// Returns `true` unless every processed identifier failed.
    pub fn is_success(&self) -> bool {
        self.status() != BatchStatus::AllFailed
    }

    /// Returns the first `limit` errors and how many were left out.
    pub fn errors_preview(&self, limit: usize) -> (&[String], usize) {
        let shown = limit.min(self.errors.len());
        (&self.errors[..shown], self.errors.len() - shown)
    }
}

/// Grants admin on one workspace to a batch of identifiers.
///
/// # Examples
///
/// ```
/// use admin_reconcile::memory::InMemoryWorkspace;
/// use admin_reconcile::{NoDirectory, Reconciler, WorkspaceRoleAssignment};
///
/// let workspace = InMemoryWorkspace::new("ws-1").with_assignment(
///     WorkspaceRoleAssignment::admin_user("oid-a", Some("a@contoso.com".into())),
/// );
///
/// let result = Reconciler::new(&workspace, &NoDirectory)
///     .reconcile(&["A@contoso.com", "b@contoso.com"], &[] as &[&str]);
///
/// assert_eq!((result.added, result.skipped, result.failed), (1, 1, 0));
/// ```
pub struct Reconciler<'a, W: WorkspaceService + ?Sized> {
    workspace: &'a W,
    connector: &'a dyn DirectoryConnector,
    options: ReconcileOptions,
    audit: Option<&'a AuditTrail>,
}

impl<'a, W: WorkspaceService + ?Sized> Reconciler<'a, W> {
    /// Creates a reconciler with default options.
    ///
    /// `connector` builds the directory client; pass
    /// [`NoDirectory`](crate::NoDirectory) to classify by syntax only.
    pub fn new(workspace: &'a W, connector: &'a dyn DirectoryConnector) -> Self {
        Self {
            workspace,
            connector,
            options: ReconcileOptions::default(),
            audit: None,
        }
    }

    /// Replaces the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] if `options` fail validation.
    pub fn with_options(mut self, options: ReconcileOptions) -> Result<Self, Error> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Records every step into `trail`.
    pub fn with_audit(mut self, trail: &'a AuditTrail) -> Self {
        self.audit = Some(trail);
        self
    }

    /// Reconciles the identifiers in `request`.
    pub fn reconcile_request(&self, request: &AdminRequest) -> BatchResult {
        self.reconcile(&request.resolve(), request.object_ids())
    }

    /// Reconciles two batches of identifiers.
    ///
    /// `via_resolution` identifiers are resolved before granting;
    /// `via_object_id` identifiers are granted by probing each principal
    /// kind. Returns a zeroed result without touching any collaborator when
    /// both are empty.
    pub fn reconcile<S: AsRef<str>>(&self, via_resolution: &[S], via_object_id: &[S]) -> BatchResult {
        let log = RunLog::new(self.workspace.workspace_id());

        if via_resolution.is_empty() && via_object_id.is_empty() {
            log.info(format_args!(
                "No administrators specified, skipping workspace administrator setup"
            ));
            return BatchResult::default();
        }

        log.info(format_args!("Setting up workspace administrators"));

        let (mut index, _degraded) = ExistingGrantIndex::snapshot_or_empty(self.workspace);
        let mut result = BatchResult::default();

        let mut applier =
            GrantApplier::new(self.workspace).with_probe_order(&self.options.probe_order);
        if let Some(trail) = self.audit {
            applier = applier.with_audit(trail);
        }

        if !via_resolution.is_empty() {
            let resolver = PrincipalResolver::connect(self.connector);
            if let Some(err) = resolver.connect_error() {
                log.warn(format_args!(
                    "Failed to build directory client: {}. Identifiers will be classified by pattern",
                    err
                ));
            }

            log.info(format_args!(
                "Adding {} administrator(s) with principal resolution",
                via_resolution.len()
            ));
            for identifier in via_resolution {
                let identifier = identifier.as_ref();
                let outcome = self.grant_resolved(identifier, &resolver, &applier, &mut index);
                self.finish(identifier, &outcome, &mut result);
            }
        }

        if !via_object_id.is_empty() {
            log.info(format_args!(
                "Adding {} administrator(s) by object ID",
                via_object_id.len()
            ));
            for object_id in via_object_id {
                let object_id = object_id.as_ref();
                let outcome = self.grant_by_object_id(object_id, &applier, &mut index);
                self.finish(object_id, &outcome, &mut result);
            }
        }

        self.summarize(&log, &result);
        result
    }

    fn grant_resolved(
        &self,
        identifier: &str,
        resolver: &PrincipalResolver<'_>,
        applier: &GrantApplier<'_, W>,
        index: &mut ExistingGrantIndex,
    ) -> GrantOutcome {
        let log = RunLog::new(self.workspace.workspace_id());

        if index.contains(identifier) {
            log.info(format_args!(
                "Skipping '{}', already a workspace administrator",
                identifier
            ));
            return GrantOutcome::skipped("Already exists");
        }

        let resolution = match resolver.resolve(identifier) {
            Ok(resolution) => resolution,
            Err(err) => return GrantOutcome::detection_failed(&err),
        };
        let principal = &resolution.principal;

        if let Some(reason) = &resolution.fallback_reason {
            self.record(
                AuditEvent::new(identifier, AuditEventKind::FellBack, Some(principal.kind()))
                    .with_detail(reason.as_str()),
            );
        }
        self.record(
            AuditEvent::new(identifier, AuditEventKind::Resolved, Some(principal.kind()))
                .with_detail(principal.object_id()),
        );
        if resolution.strategy == ResolveStrategy::Syntax {
            log.debug(format_args!(
                "'{}' classified by pattern as {}",
                identifier,
                principal.kind()
            ));
        }

        if index.contains(principal.object_id()) {
            log.info(format_args!(
                "Skipping '{}', already a workspace administrator",
                identifier
            ));
            index.insert(identifier);
            return GrantOutcome::skipped("Already exists (by object ID)");
        }

        let outcome = applier.apply_resolved(principal, identifier);
        if outcome.is_added() {
            index.insert(principal.object_id());
            index.insert(identifier);
        }
        outcome
    }

    fn grant_by_object_id(
        &self,
        object_id: &str,
        applier: &GrantApplier<'_, W>,
        index: &mut ExistingGrantIndex,
    ) -> GrantOutcome {
        if index.contains(object_id) {
            RunLog::new(self.workspace.workspace_id()).info(format_args!(
                "Skipping '{}', already a workspace administrator",
                object_id
            ));
            return GrantOutcome::skipped("Already exists");
        }

        let outcome = applier.apply_by_object_id(object_id);
        if outcome.is_added() {
            index.insert(object_id);
        }
        outcome
    }

    fn finish(&self, identifier: &str, outcome: &GrantOutcome, result: &mut BatchResult) {
        let kind = match outcome.status {
            GrantStatus::Added => AuditEventKind::Added,
            GrantStatus::Skipped => AuditEventKind::Skipped,
            GrantStatus::Failed => AuditEventKind::Failed,
        };
        self.record(
            AuditEvent::new(identifier, kind, outcome.granted_as).with_detail(outcome.detail.as_str()),
        );
        result.record(identifier, outcome);
    }

    fn summarize(&self, log: &RunLog<'_>, result: &BatchResult) {
        log.info(format_args!(
            "Workspace administrators summary - Added: {}, Skipped: {}, Failed: {}, Total: {}",
            result.added,
            result.skipped,
            result.failed,
            result.total()
        ));

        if result.errors.is_empty() {
            return;
        }

        let (shown, remaining) = result.errors_preview(self.options.error_display_limit);
        log.warn(format_args!("Errors in workspace administrator setup:"));
        for error in shown {
            log.warn(format_args!("  {}", error));
        }
        if remaining > 0 {
            log.warn(format_args!("  ... and {} more error(s)", remaining));
        }
        if result.status() == BatchStatus::AllFailed {
            log.error(format_args!("Failed to add workspace administrators"));
        }
    }

    fn record(&self, event: AuditEvent) {
        if let Some(trail) = self.audit {
            trail.record(event);
        }
    }
}
