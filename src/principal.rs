//! Principal kinds and resolved principal records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display name recorded when the directory could not be consulted.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

/// The kind of a directory principal.
///
/// This is a closed set: the workspace API accepts no other principal types
/// for direct role assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalKind {
    /// A human user, addressed by UPN or object ID.
    User,
    /// A service or application principal.
    ServicePrincipal,
}

impl PrincipalKind {
    /// Every kind, in the order probing tries them.
    pub const ALL: [PrincipalKind; 2] = [PrincipalKind::User, PrincipalKind::ServicePrincipal];

    /// Returns the name the workspace API uses for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::User => "User",
            PrincipalKind::ServicePrincipal => "ServicePrincipal",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A principal whose kind and object ID are known.
///
/// `upn` is only ever set for users and `application_id` only for service
/// principals; the constructors enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrincipal {
    kind: PrincipalKind,
    object_id: String,
    display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    upn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_id: Option<String>,
}

impl ResolvedPrincipal {
    /// Creates a resolved user.
    pub fn user(
        object_id: impl Into<String>,
        display_name: impl Into<String>,
        upn: Option<String>,
    ) -> Self {
        Self {
            kind: PrincipalKind::User,
            object_id: object_id.into(),
            display_name: display_name.into(),
            upn,
            application_id: None,
        }
    }

    /// Creates a resolved service principal.
    pub fn service_principal(
        object_id: impl Into<String>,
        display_name: impl Into<String>,
        application_id: Option<String>,
    ) -> Self {
        Self {
            kind: PrincipalKind::ServicePrincipal,
            object_id: object_id.into(),
            display_name: display_name.into(),
            upn: None,
            application_id,
        }
    }

    /// Returns the principal kind.
    pub fn kind(&self) -> PrincipalKind {
        self.kind
    }

    /// Returns the stable directory identifier used for the grant.
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Returns the display name, `"Unknown"` when not looked up.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the user principal name, if this is a user.
    pub fn upn(&self) -> Option<&str> {
        self.upn.as_deref()
    }

    /// Returns the application (client) ID, if this is a service principal.
    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_order_is_user_first() {
        assert_eq!(
            PrincipalKind::ALL,
            [PrincipalKind::User, PrincipalKind::ServicePrincipal]
        );
    }

    #[test]
    fn kind_names_match_api() {
        assert_eq!(PrincipalKind::User.to_string(), "User");
        assert_eq!(
            PrincipalKind::ServicePrincipal.to_string(),
            "ServicePrincipal"
        );
    }

    #[test]
    fn constructors_keep_metadata_per_kind() {
        let user = ResolvedPrincipal::user("oid-1", "Alice", Some("alice@contoso.com".into()));
        assert_eq!(user.kind(), PrincipalKind::User);
        assert_eq!(user.upn(), Some("alice@contoso.com"));
        assert_eq!(user.application_id(), None);

        let sp = ResolvedPrincipal::service_principal("oid-2", "Deployer", Some("app-1".into()));
        assert_eq!(sp.kind(), PrincipalKind::ServicePrincipal);
        assert_eq!(sp.upn(), None);
        assert_eq!(sp.application_id(), Some("app-1"));
    }
}
