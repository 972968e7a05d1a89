//! Workspace service collaborator and role-assignment records.

use serde::{Deserialize, Serialize};

use crate::error::WorkspaceError;
use crate::principal::{PrincipalKind, ResolvedPrincipal};

/// The only role this crate grants.
pub const ADMIN_ROLE: &str = "Admin";

/// A role assignment as listed by the workspace API.
///
/// Deserializes from the API's JSON shape:
///
/// ```
/// use admin_reconcile::WorkspaceRoleAssignment;
///
/// let json = r#"{
///     "role": "Admin",
///     "principal": {
///         "id": "oid-1",
///         "type": "User",
///         "userDetails": { "userPrincipalName": "alice@contoso.com" }
///     }
/// }"#;
/// let assignment: WorkspaceRoleAssignment = serde_json::from_str(json).unwrap();
/// assert!(assignment.is_admin());
/// assert_eq!(assignment.principal.upn(), Some("alice@contoso.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRoleAssignment {
    /// Role name, e.g. `"Admin"` or `"Viewer"`.
    pub role: String,
    /// The principal holding the role.
    pub principal: AssignedPrincipal,
}

impl WorkspaceRoleAssignment {
    /// Creates an admin assignment for a user.
    pub fn admin_user(id: impl Into<String>, upn: Option<String>) -> Self {
        Self {
            role: ADMIN_ROLE.to_string(),
            principal: AssignedPrincipal {
                id: id.into(),
                kind: Some(PrincipalKind::User.as_str().to_string()),
                user_details: upn.map(|user_principal_name| UserDetails {
                    user_principal_name: Some(user_principal_name),
                }),
            },
        }
    }

    /// Creates an admin assignment for a service principal.
    pub fn admin_service_principal(id: impl Into<String>) -> Self {
        Self {
            role: ADMIN_ROLE.to_string(),
            principal: AssignedPrincipal {
                id: id.into(),
                kind: Some(PrincipalKind::ServicePrincipal.as_str().to_string()),
                user_details: None,
            },
        }
    }

    /// Returns `true` if this assignment grants the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// The principal side of a role assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedPrincipal {
    /// Directory object ID.
    #[serde(default)]
    pub id: String,
    /// Principal type as reported by the API. Groups and other types this
    /// crate never grants are kept verbatim.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// User details; present for users only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_details: Option<UserDetails>,
}

impl AssignedPrincipal {
    /// Returns the user principal name, if reported.
    pub fn upn(&self) -> Option<&str> {
        self.user_details
            .as_ref()
            .and_then(|d| d.user_principal_name.as_deref())
    }
}

/// User-specific principal details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    /// The user's UPN.
    #[serde(default)]
    pub user_principal_name: Option<String>,
}

/// A request to add a role assignment.
///
/// Built with [`AddRoleAssignment::new`] for a bare object ID, or
/// [`AddRoleAssignment::for_principal`] to carry resolved metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRoleAssignment {
    /// Directory object ID (or UPN, for users classified by syntax).
    pub principal_id: String,
    /// Principal kind to assign as.
    pub principal_type: PrincipalKind,
    /// Role to grant. Always [`ADMIN_ROLE`].
    pub role: &'static str,
    /// Display name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// UPN for users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
    /// Application ID for service principals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
}

impl AddRoleAssignment {
    /// Creates an admin grant for `principal_id` as `principal_type`, with no metadata.
    pub fn new(principal_id: impl Into<String>, principal_type: PrincipalKind) -> Self {
        Self {
            principal_id: principal_id.into(),
            principal_type,
            role: ADMIN_ROLE,
            display_name: None,
            user_principal_name: None,
            application_id: None,
        }
    }

    /// Creates an admin grant for a resolved principal.
    ///
    /// Users carry their UPN, defaulting to `requested` when the directory
    /// did not return one; service principals carry their application ID.
    pub fn for_principal(principal: &ResolvedPrincipal, requested: &str) -> Self {
        let request = Self::new(principal.object_id(), principal.kind())
            .with_display_name(principal.display_name());

        match principal.kind() {
            PrincipalKind::User => request
                .with_user_principal_name(principal.upn().unwrap_or(requested).to_string()),
            PrincipalKind::ServicePrincipal => match principal.application_id() {
                Some(app_id) => request.with_application_id(app_id),
                None => request,
            },
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the user principal name.
    pub fn with_user_principal_name(mut self, upn: impl Into<String>) -> Self {
        self.user_principal_name = Some(upn.into());
        self
    }

    /// Sets the application ID.
    pub fn with_application_id(mut self, app_id: impl Into<String>) -> Self {
        self.application_id = Some(app_id.into());
        self
    }
}

/// Role-assignment operations on a single workspace.
///
/// Each call is one bounded request/response exchange; timeouts and retries
/// are the implementation's concern.
pub trait WorkspaceService {
    /// Returns the workspace identifier, for logging.
    fn workspace_id(&self) -> &str;

    /// Lists role assignments. `full` requests every page.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] if the listing cannot be retrieved.
    fn list_role_assignments(&self, full: bool)
        -> Result<Vec<WorkspaceRoleAssignment>, WorkspaceError>;

    /// Adds a role assignment.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Api`] with the status code when the API
    /// rejects the call, [`WorkspaceError::Other`] otherwise.
    fn add_role_assignment(&self, request: &AddRoleAssignment) -> Result<(), WorkspaceError>;
}

impl<W: WorkspaceService + ?Sized> WorkspaceService for &W {
    fn workspace_id(&self) -> &str {
        (**self).workspace_id()
    }

    fn list_role_assignments(
        &self,
        full: bool,
    ) -> Result<Vec<WorkspaceRoleAssignment>, WorkspaceError> {
        (**self).list_role_assignments(full)
    }

    fn add_role_assignment(&self, request: &AddRoleAssignment) -> Result<(), WorkspaceError> {
        (**self).add_role_assignment(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_request_carries_upn() {
        let p = ResolvedPrincipal::user("oid-1", "Alice", Some("alice@contoso.com".into()));
        let req = AddRoleAssignment::for_principal(&p, "ALICE@contoso.com");

        assert_eq!(req.principal_id, "oid-1");
        assert_eq!(req.principal_type, PrincipalKind::User);
        assert_eq!(req.role, "Admin");
        assert_eq!(req.display_name.as_deref(), Some("Alice"));
        assert_eq!(req.user_principal_name.as_deref(), Some("alice@contoso.com"));
        assert_eq!(req.application_id, None);
    }

    #[test]
    fn user_request_defaults_upn_to_requested() {
        let p = ResolvedPrincipal::user("oid-1", "Alice", None);
        let req = AddRoleAssignment::for_principal(&p, "alice@contoso.com");
        assert_eq!(req.user_principal_name.as_deref(), Some("alice@contoso.com"));
    }

    #[test]
    fn service_principal_request_carries_app_id() {
        let p = ResolvedPrincipal::service_principal("oid-2", "Deployer", Some("app-2".into()));
        let req = AddRoleAssignment::for_principal(&p, "app-2");

        assert_eq!(req.principal_type, PrincipalKind::ServicePrincipal);
        assert_eq!(req.application_id.as_deref(), Some("app-2"));
        assert_eq!(req.user_principal_name, None);
    }

    #[test]
    fn assignment_json_tolerates_missing_details() {
        let json = r#"[
            {"role": "Admin", "principal": {"id": "sp-1", "type": "ServicePrincipal"}},
            {"role": "Viewer", "principal": {"id": "u-2", "userDetails": {}}},
            {"role": "Admin", "principal": {"id": "g-3", "type": "Group"}}
        ]"#;
        let parsed: Vec<WorkspaceRoleAssignment> = serde_json::from_str(json).unwrap();
        assert!(parsed[0].is_admin());
        assert_eq!(parsed[0].principal.upn(), None);
        assert!(!parsed[1].is_admin());
        assert_eq!(parsed[1].principal.upn(), None);
        assert_eq!(parsed[2].principal.kind.as_deref(), Some("Group"));
    }
}
