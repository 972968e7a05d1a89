//! Principal resolution.
//!
//! Resolution is an ordered list of strategies. Each strategy declares when
//! it applies and how it fails:
//!
//! | Strategy | Applies when | On failure |
//! |---|---|---|
//! | [`ResolveStrategy::Directory`] | a directory client exists | lookup errors reject; anything else falls through |
//! | [`ResolveStrategy::Syntax`] | always | rejects |
//!
//! The first strategy to produce a principal wins. A rejection ends the
//! cascade immediately.

use std::fmt;

use crate::classify::classify;
use crate::directory::{DirectoryConnector, DirectoryService};
use crate::error::{DirectoryError, Error, TransportUnavailable};
use crate::principal::ResolvedPrincipal;

/// A way of turning an identifier into a [`ResolvedPrincipal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Ask the directory service.
    Directory,
    /// Classify by surface syntax.
    Syntax,
}

impl ResolveStrategy {
    /// Strategies in the order they are tried.
    pub const ORDER: [ResolveStrategy; 2] = [ResolveStrategy::Directory, ResolveStrategy::Syntax];
}

impl fmt::Display for ResolveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveStrategy::Directory => write!(f, "directory"),
            ResolveStrategy::Syntax => write!(f, "syntax"),
        }
    }
}

/// The result of a single strategy.
enum Attempt {
    Resolved(ResolvedPrincipal),
    Rejected(Error),
    FallThrough(String),
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved principal.
    pub principal: ResolvedPrincipal,
    /// The strategy that produced it.
    pub strategy: ResolveStrategy,
    /// Why an earlier strategy was skipped over, if one was.
    pub fallback_reason: Option<String>,
}

/// Resolves identifiers, preferring the directory and falling back to syntax.
///
/// # Examples
///
/// ```
/// use admin_reconcile::{PrincipalResolver, PrincipalKind, ResolveStrategy};
///
/// let resolver = PrincipalResolver::classifier_only();
/// let resolution = resolver.resolve("user@contoso.com").unwrap();
///
/// assert_eq!(resolution.strategy, ResolveStrategy::Syntax);
/// assert_eq!(resolution.principal.kind(), PrincipalKind::User);
/// ```
pub struct PrincipalResolver<'d> {
    directory: Option<Box<dyn DirectoryService + 'd>>,
    connect_error: Option<TransportUnavailable>,
}

impl<'d> PrincipalResolver<'d> {
    /// Creates a resolver over an existing directory client.
    pub fn new(directory: impl DirectoryService + 'd) -> Self {
        Self {
            directory: Some(Box::new(directory)),
            connect_error: None,
        }
    }

    /// Creates a resolver that only classifies by syntax.
    pub fn classifier_only() -> Self {
        Self {
            directory: None,
            connect_error: None,
        }
    }

    /// Builds a directory client through `connector`.
    ///
    /// A connector failure is not an error: the resolver degrades to
    /// syntactic classification and the failure is kept for
    /// [`connect_error`](Self::connect_error).
    pub fn connect<C: DirectoryConnector + ?Sized>(connector: &'d C) -> Self {
        match connector.connect() {
            Ok(directory) => Self {
                directory: Some(directory),
                connect_error: None,
            },
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "directory client unavailable, falling back to identifier pattern detection"
                );
                Self {
                    directory: None,
                    connect_error: Some(err),
                }
            }
        }
    }

    /// Returns `true` if a directory client is available.
    pub fn has_directory(&self) -> bool {
        self.directory.is_some()
    }

    /// Returns the connector failure, if construction failed.
    pub fn connect_error(&self) -> Option<&TransportUnavailable> {
        self.connect_error.as_ref()
    }

    /// Resolves `identifier` to a principal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvableIdentifier`] when the directory rejects
    /// the identifier, or when it falls through to syntactic classification
    /// and that fails too. Directory-specific error kinds never escape.
    pub fn resolve(&self, identifier: &str) -> Result<Resolution, Error> {
        let mut fallback_reason = None;

        for strategy in ResolveStrategy::ORDER {
            if !self.applies(strategy) {
                continue;
            }

            match self.attempt(strategy, identifier) {
                Attempt::Resolved(principal) => {
                    return Ok(Resolution {
                        principal,
                        strategy,
                        fallback_reason,
                    });
                }
                Attempt::Rejected(err) => return Err(err),
                Attempt::FallThrough(reason) => {
                    tracing::warn!(
                        identifier,
                        strategy = %strategy,
                        reason = %reason,
                        "lookup failed, falling back to identifier pattern detection"
                    );
                    fallback_reason = Some(reason);
                }
            }
        }

        Err(Error::unresolvable(
            identifier,
            fallback_reason.unwrap_or_else(|| "no resolution strategy applied".to_string()),
        ))
    }

    fn applies(&self, strategy: ResolveStrategy) -> bool {
        match strategy {
            ResolveStrategy::Directory => self.directory.is_some(),
            ResolveStrategy::Syntax => true,
        }
    }

    fn attempt(&self, strategy: ResolveStrategy, identifier: &str) -> Attempt {
        match strategy {
            ResolveStrategy::Directory => {
                let Some(directory) = self.directory.as_ref() else {
                    return Attempt::FallThrough("no directory client".to_string());
                };
                match directory.resolve_principal(identifier) {
                    Ok(principal) => Attempt::Resolved(principal),
                    Err(DirectoryError::Lookup(lookup)) => {
                        Attempt::Rejected(Error::unresolvable(identifier, lookup.to_string()))
                    }
                    Err(DirectoryError::Unavailable(reason)) => Attempt::FallThrough(reason),
                }
            }
            ResolveStrategy::Syntax => match classify(identifier) {
                Ok(principal) => Attempt::Resolved(principal),
                Err(err) => Attempt::Rejected(err),
            },
        }
    }
}

impl fmt::Debug for PrincipalResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrincipalResolver")
            .field("has_directory", &self.has_directory())
            .field("connect_error", &self.connect_error)
            .finish()
    }
}
