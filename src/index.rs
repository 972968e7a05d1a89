//! Index of principals that already hold the admin role.

use std::collections::HashSet;

use crate::error::WorkspaceError;
use crate::logging::RunLog;
use crate::workspace::{WorkspaceRoleAssignment, WorkspaceService};

/// Case-insensitive set of object IDs and UPNs holding the admin role.
///
/// Built once per run and then updated in place after each grant, so later
/// identifiers in the same run see earlier additions.
///
/// # Examples
///
/// ```
/// use admin_reconcile::ExistingGrantIndex;
///
/// let mut index = ExistingGrantIndex::new();
/// index.insert("Alice@Contoso.com");
///
/// assert!(index.contains("alice@contoso.com"));
/// assert!(index.contains("ALICE@CONTOSO.COM"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingGrantIndex {
    keys: HashSet<String>,
    admin_count: usize,
}

impl ExistingGrantIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from a role-assignment listing.
    ///
    /// Only `Admin` assignments are indexed. Each contributes its object ID
    /// and, when reported, its UPN.
    pub fn from_assignments<'a, I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = &'a WorkspaceRoleAssignment>,
    {
        let mut index = Self::new();

        for assignment in assignments.into_iter().filter(|a| a.is_admin()) {
            index.admin_count += 1;
            index.insert(&assignment.principal.id);
            if let Some(upn) = assignment.principal.upn() {
                index.insert(upn);
            }
        }

        index
    }

    /// Snapshots the workspace's current admin assignments.
    ///
    /// # Errors
    ///
    /// Returns the listing failure unchanged. Most callers want
    /// [`snapshot_or_empty`](Self::snapshot_or_empty) instead.
    pub fn snapshot<W: WorkspaceService + ?Sized>(workspace: &W) -> Result<Self, WorkspaceError> {
        let assignments = workspace.list_role_assignments(true)?;
        Ok(Self::from_assignments(&assignments))
    }

    /// Snapshots the workspace, degrading to an empty index on failure.
    ///
    /// The returned flag is `true` when the snapshot failed and duplicate
    /// protection is therefore off for this run.
    pub fn snapshot_or_empty<W: WorkspaceService + ?Sized>(workspace: &W) -> (Self, bool) {
        let log = RunLog::new(workspace.workspace_id());
        log.debug(format_args!("Checking existing role assignments"));

        match Self::snapshot(workspace) {
            Ok(index) => {
                log.info(format_args!(
                    "Found {} existing administrator(s)",
                    index.admin_count()
                ));
                (index, false)
            }
            Err(err) => {
                log.warn(format_args!(
                    "Could not retrieve existing role assignments: {}. Will proceed but may create duplicates",
                    err
                ));
                (Self::new(), true)
            }
        }
    }

    /// Returns `true` if `key` is indexed, ignoring case.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&key.to_lowercase())
    }

    /// Adds `key`, lower-cased. Empty keys are ignored.
    ///
    /// Returns `true` if the key was not already present.
    pub fn insert(&mut self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        self.keys.insert(key.to_lowercase())
    }

    /// Returns the number of admin assignments seen in the snapshot.
    pub fn admin_count(&self) -> usize {
        self.admin_count
    }

    /// Returns the number of indexed keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryWorkspace;
    use crate::workspace::{AssignedPrincipal, UserDetails};

    fn viewer(id: &str, upn: &str) -> WorkspaceRoleAssignment {
        WorkspaceRoleAssignment {
            role: "Viewer".to_string(),
            principal: AssignedPrincipal {
                id: id.to_string(),
                kind: Some("User".to_string()),
                user_details: Some(UserDetails {
                    user_principal_name: Some(upn.to_string()),
                }),
            },
        }
    }

    #[test]
    fn indexes_admin_ids_and_upns_only() {
        let assignments = vec![
            WorkspaceRoleAssignment::admin_user("OID-A", Some("Alice@Contoso.com".into())),
            WorkspaceRoleAssignment::admin_service_principal("OID-SP"),
            viewer("oid-v", "viewer@contoso.com"),
        ];
        let index = ExistingGrantIndex::from_assignments(&assignments);

        assert_eq!(index.admin_count(), 2);
        assert_eq!(index.len(), 3);
        assert!(index.contains("oid-a"));
        assert!(index.contains("alice@contoso.com"));
        assert!(index.contains("oid-sp"));
        assert!(!index.contains("oid-v"));
        assert!(!index.contains("viewer@contoso.com"));
    }

    #[test]
    fn empty_ids_are_not_indexed() {
        let mut index = ExistingGrantIndex::new();
        assert!(!index.insert(""));
        assert!(index.is_empty());
    }

    #[test]
    fn snapshot_requests_full_listing() {
        let workspace = InMemoryWorkspace::new("ws-1")
            .with_assignment(WorkspaceRoleAssignment::admin_service_principal("sp-1"));

        let index = ExistingGrantIndex::snapshot(&workspace).unwrap();
        assert!(index.contains("SP-1"));
        assert_eq!(workspace.list_calls(), vec![true]);
    }

    #[test]
    fn snapshot_failure_degrades_to_empty() {
        let workspace = InMemoryWorkspace::new("ws-1")
            .with_assignment(WorkspaceRoleAssignment::admin_service_principal("sp-1"))
            .failing_list(WorkspaceError::Other("timeout".to_string()));

        let (index, degraded) = ExistingGrantIndex::snapshot_or_empty(&workspace);
        assert!(degraded);
        assert!(index.is_empty());
    }
}
