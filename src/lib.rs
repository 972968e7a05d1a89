//! Idempotent reconciliation of workspace administrator role assignments.
//!
//! This crate grants the `Admin` role on a workspace to a batch of
//! requested identities. Identities may be given as user principal names,
//! object IDs or application IDs, and are resolved against a directory
//! before granting. Principals that already hold the role are skipped, and
//! one identity's failure never stops the rest of the batch.
//!
//! # Core Types
//!
//! - [`Reconciler`]: runs a batch and produces a [`BatchResult`]
//! - [`ExistingGrantIndex`]: case-insensitive set of current admins
//! - [`PrincipalResolver`]: directory lookup with syntactic fallback
//! - [`GrantApplier`]: single-shot and probing grant strategies
//! - [`WorkspaceService`] / [`DirectoryService`]: collaborator seams
//!
//! # Examples
//!
//! ```
//! use admin_reconcile::memory::{InMemoryWorkspace, StaticDirectory};
//! use admin_reconcile::{AdminRequest, BatchStatus, Reconciler, ResolvedPrincipal};
//!
//! let workspace = InMemoryWorkspace::new("ws-123");
//! let directory = StaticDirectory::new().with_principal(
//!     "alice@contoso.com",
//!     ResolvedPrincipal::user("oid-alice", "Alice", Some("alice@contoso.com".into())),
//! );
//!
//! let request = AdminRequest::new()
//!     .with_csv("alice@contoso.com")
//!     .with_object_ids(["12345678-1234-1234-1234-123456789012"]);
//!
//! let result = Reconciler::new(&workspace, &directory).reconcile_request(&request);
//! assert_eq!(result.added, 2);
//! assert_eq!(result.status(), BatchStatus::Progressed);
//!
//! // Running again changes nothing.
//! let again = Reconciler::new(&workspace, &directory).reconcile_request(&request);
//! assert_eq!((again.added, again.skipped), (0, 2));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod classify;
mod config;
mod directory;
mod error;
mod grant;
mod index;
mod logging;
pub mod memory;
mod principal;
mod reconcile;
mod request;
mod resolver;
mod workspace;

pub use classify::{classify, is_guid, looks_like_upn};
pub use config::{ReconcileOptions, DEFAULT_ERROR_DISPLAY_LIMIT};
pub use directory::{DirectoryConnector, DirectoryService, NoDirectory};
pub use error::{
    DirectoryError, DirectoryLookupError, DirectoryLookupKind, Error, TransportUnavailable,
    WorkspaceApiError, WorkspaceError,
};
pub use grant::{GrantApplier, GrantOutcome, GrantStatus};
pub use index::ExistingGrantIndex;
pub use logging::RunLog;
pub use principal::{PrincipalKind, ResolvedPrincipal, UNKNOWN_DISPLAY_NAME};
pub use reconcile::{BatchResult, BatchStatus, Reconciler};
pub use request::{parse_csv, AdminRequest};
pub use resolver::{PrincipalResolver, Resolution, ResolveStrategy};
pub use workspace::{
    AddRoleAssignment, AssignedPrincipal, UserDetails, WorkspaceRoleAssignment,
    WorkspaceService, ADMIN_ROLE,
};
