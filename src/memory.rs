//! In-memory collaborators.
//!
//! [`InMemoryWorkspace`] and [`StaticDirectory`] stand in for the REST
//! clients in tests and dry runs. Both record the calls made against them.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::directory::{DirectoryConnector, DirectoryService};
use crate::error::{
    DirectoryError, DirectoryLookupError, DirectoryLookupKind, TransportUnavailable,
    WorkspaceError,
};
use crate::principal::{PrincipalKind, ResolvedPrincipal};
use crate::workspace::{AddRoleAssignment, WorkspaceRoleAssignment, WorkspaceService};

/// A workspace held in memory.
///
/// Successful adds append an admin assignment, so a second run against the
/// same instance observes the first run's grants.
///
/// # Examples
///
/// ```
/// use admin_reconcile::memory::InMemoryWorkspace;
/// use admin_reconcile::{AddRoleAssignment, PrincipalKind, WorkspaceService};
///
/// let workspace = InMemoryWorkspace::new("ws-1");
/// workspace
///     .add_role_assignment(&AddRoleAssignment::new("oid-1", PrincipalKind::User))
///     .unwrap();
///
/// assert_eq!(workspace.add_calls().len(), 1);
/// assert_eq!(workspace.assignments().len(), 1);
/// ```
#[derive(Debug)]
pub struct InMemoryWorkspace {
    workspace_id: String,
    assignments: RefCell<Vec<WorkspaceRoleAssignment>>,
    list_failure: Option<WorkspaceError>,
    add_failures: HashMap<(String, Option<PrincipalKind>), WorkspaceError>,
    list_calls: RefCell<Vec<bool>>,
    add_calls: RefCell<Vec<AddRoleAssignment>>,
}

impl InMemoryWorkspace {
    /// Creates an empty workspace.
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            assignments: RefCell::new(Vec::new()),
            list_failure: None,
            add_failures: HashMap::new(),
            list_calls: RefCell::new(Vec::new()),
            add_calls: RefCell::new(Vec::new()),
        }
    }

    /// Seeds an existing role assignment.
    pub fn with_assignment(self, assignment: WorkspaceRoleAssignment) -> Self {
        self.assignments.borrow_mut().push(assignment);
        self
    }

    /// Makes every listing fail with `error`.
    pub fn failing_list(mut self, error: WorkspaceError) -> Self {
        self.list_failure = Some(error);
        self
    }

    /// Makes adds for `principal_id` fail with `error`.
    ///
    /// With `kind` set, only adds as that kind fail; with `None`, all do.
    pub fn failing_add(
        mut self,
        principal_id: &str,
        kind: Option<PrincipalKind>,
        error: WorkspaceError,
    ) -> Self {
        self.add_failures
            .insert((principal_id.to_lowercase(), kind), error);
        self
    }

    /// Returns the current assignments.
    pub fn assignments(&self) -> Vec<WorkspaceRoleAssignment> {
        self.assignments.borrow().clone()
    }

    /// Returns the `full` flag of every listing call, in order.
    pub fn list_calls(&self) -> Vec<bool> {
        self.list_calls.borrow().clone()
    }

    /// Returns every add call, failed ones included, in order.
    pub fn add_calls(&self) -> Vec<AddRoleAssignment> {
        self.add_calls.borrow().clone()
    }

    fn add_failure(&self, request: &AddRoleAssignment) -> Option<&WorkspaceError> {
        let id = request.principal_id.to_lowercase();
        self.add_failures
            .get(&(id.clone(), Some(request.principal_type)))
            .or_else(|| self.add_failures.get(&(id, None)))
    }
}

impl WorkspaceService for InMemoryWorkspace {
    fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    fn list_role_assignments(
        &self,
        full: bool,
    ) -> Result<Vec<WorkspaceRoleAssignment>, WorkspaceError> {
        self.list_calls.borrow_mut().push(full);
        match &self.list_failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.assignments()),
        }
    }

    fn add_role_assignment(&self, request: &AddRoleAssignment) -> Result<(), WorkspaceError> {
        self.add_calls.borrow_mut().push(request.clone());

        if let Some(err) = self.add_failure(request) {
            return Err(err.clone());
        }

        let assignment = match request.principal_type {
            PrincipalKind::User => WorkspaceRoleAssignment::admin_user(
                request.principal_id.clone(),
                request.user_principal_name.clone(),
            ),
            PrincipalKind::ServicePrincipal => {
                WorkspaceRoleAssignment::admin_service_principal(request.principal_id.clone())
            }
        };
        self.assignments.borrow_mut().push(assignment);
        Ok(())
    }
}

/// A directory backed by a fixed table.
///
/// Identifiers are matched case-insensitively. Unknown identifiers resolve
/// to a not-found lookup error.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    entries: HashMap<String, Result<ResolvedPrincipal, DirectoryError>>,
    lookups: RefCell<Vec<String>>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `identifier` to `principal`.
    pub fn with_principal(mut self, identifier: &str, principal: ResolvedPrincipal) -> Self {
        self.entries.insert(identifier.to_lowercase(), Ok(principal));
        self
    }

    /// Makes lookups of `identifier` fail with `error`.
    pub fn with_error(mut self, identifier: &str, error: DirectoryError) -> Self {
        self.entries.insert(identifier.to_lowercase(), Err(error));
        self
    }

    /// Returns every identifier looked up, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }
}

impl DirectoryService for StaticDirectory {
    fn resolve_principal(&self, identifier: &str) -> Result<ResolvedPrincipal, DirectoryError> {
        self.lookups.borrow_mut().push(identifier.to_string());

        match self.entries.get(&identifier.to_lowercase()) {
            Some(entry) => entry.clone(),
            None => Err(DirectoryLookupError::new(
                DirectoryLookupKind::NotFound,
                format!("no user or service principal matches '{identifier}'"),
            )
            .into()),
        }
    }
}

impl DirectoryConnector for StaticDirectory {
    fn connect(&self) -> Result<Box<dyn DirectoryService + '_>, TransportUnavailable> {
        Ok(Box::new(self))
    }
}
