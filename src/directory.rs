//! Directory service collaborator.
//!
//! The directory is the authority on what an identifier names. Wire-level
//! clients live outside this crate and plug in through [`DirectoryService`].

use crate::error::{DirectoryError, TransportUnavailable};
use crate::principal::ResolvedPrincipal;

/// Resolves raw identifiers against a principal directory.
///
/// Implementations perform their own kind detection: given a UPN, an object
/// ID or an application ID they decide whether it names a user or a service
/// principal and return its stable object ID.
pub trait DirectoryService {
    /// Resolves `identifier` to a principal.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::Lookup`] when the directory answered but could not
    ///   resolve the identifier (not found, ambiguous, transient).
    /// - [`DirectoryError::Unavailable`] for any other failure on the
    ///   directory path.
    fn resolve_principal(&self, identifier: &str) -> Result<ResolvedPrincipal, DirectoryError>;
}

impl<D: DirectoryService + ?Sized> DirectoryService for &D {
    fn resolve_principal(&self, identifier: &str) -> Result<ResolvedPrincipal, DirectoryError> {
        (**self).resolve_principal(identifier)
    }
}

impl<D: DirectoryService + ?Sized> DirectoryService for Box<D> {
    fn resolve_principal(&self, identifier: &str) -> Result<ResolvedPrincipal, DirectoryError> {
        (**self).resolve_principal(identifier)
    }
}

/// Builds a [`DirectoryService`] on demand.
///
/// Construction usually means acquiring credentials, which may not be
/// possible in constrained environments. Failure here is never fatal to a
/// reconciliation run.
pub trait DirectoryConnector {
    /// Constructs a directory client.
    ///
    /// # Errors
    ///
    /// Returns [`TransportUnavailable`] if the client cannot be built.
    fn connect(&self) -> Result<Box<dyn DirectoryService + '_>, TransportUnavailable>;
}

impl<F> DirectoryConnector for F
where
    F: Fn() -> Result<Box<dyn DirectoryService>, TransportUnavailable>,
{
    fn connect(&self) -> Result<Box<dyn DirectoryService + '_>, TransportUnavailable> {
        let service: Box<dyn DirectoryService + '_> = self()?;
        Ok(service)
    }
}

/// A connector that always fails.
///
/// Use this to run with syntactic classification only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirectory;

impl DirectoryConnector for NoDirectory {
    fn connect(&self) -> Result<Box<dyn DirectoryService + '_>, TransportUnavailable> {
        Err(TransportUnavailable::new(
            "directory",
            "no directory client configured",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DirectoryLookupError, DirectoryLookupKind};

    struct NotFound;

    impl DirectoryService for NotFound {
        fn resolve_principal(
            &self,
            identifier: &str,
        ) -> Result<ResolvedPrincipal, DirectoryError> {
            Err(DirectoryLookupError::new(DirectoryLookupKind::NotFound, identifier).into())
        }
    }

    #[test]
    fn closure_connector_builds_service() {
        let connector = || -> Result<Box<dyn DirectoryService>, TransportUnavailable> {
            Ok(Box::new(NotFound))
        };
        let service = connector.connect().expect("closure connector");
        assert!(matches!(
            service.resolve_principal("x"),
            Err(DirectoryError::Lookup(_))
        ));
    }

    #[test]
    fn no_directory_never_connects() {
        let err = NoDirectory.connect().err().expect("must fail");
        assert_eq!(err.service, "directory");
    }
}
