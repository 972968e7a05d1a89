//! Syntactic identifier classification.
//!
//! This is the last-resort strategy when the directory cannot be consulted.
//! It looks only at the surface syntax of an identifier, so it cannot tell
//! an application ID from an object ID and cannot check that the principal
//! exists.

use uuid::Uuid;

use crate::error::Error;
use crate::principal::{ResolvedPrincipal, UNKNOWN_DISPLAY_NAME};

/// Returns `true` if `value` parses as a GUID.
///
/// Accepts the textual forms a GUID is commonly written in: hyphenated,
/// simple (32 hex digits), braced and `urn:uuid:` prefixed.
pub fn is_guid(value: &str) -> bool {
    !value.is_empty() && Uuid::try_parse(value).is_ok()
}

/// Returns `true` if `value` looks like a user principal name.
pub fn looks_like_upn(value: &str) -> bool {
    value.contains('@') && value.contains('.')
}

/// Classifies an identifier by syntax alone.
///
/// - A GUID is taken to be a service principal object ID.
/// - Anything containing both `@` and `.` is taken to be a user UPN, which
///   doubles as the assignable principal ID.
///
/// # Errors
///
/// Returns [`Error::UnresolvableIdentifier`] when neither rule matches.
///
/// # Examples
///
/// ```
/// use admin_reconcile::{classify, PrincipalKind};
///
/// let sp = classify("12345678-1234-1234-1234-123456789012").unwrap();
/// assert_eq!(sp.kind(), PrincipalKind::ServicePrincipal);
///
/// let user = classify("user@contoso.com").unwrap();
/// assert_eq!(user.kind(), PrincipalKind::User);
///
/// assert!(classify("not-an-id").is_err());
/// ```
pub fn classify(identifier: &str) -> Result<ResolvedPrincipal, Error> {
    if is_guid(identifier) {
        return Ok(ResolvedPrincipal::service_principal(
            identifier,
            UNKNOWN_DISPLAY_NAME,
            None,
        ));
    }

    if looks_like_upn(identifier) {
        return Ok(ResolvedPrincipal::user(
            identifier,
            UNKNOWN_DISPLAY_NAME,
            Some(identifier.to_string()),
        ));
    }

    Err(Error::unresolvable(
        identifier,
        "not a user principal name or a GUID",
    ))
}
