//! Reconciliation options.

use serde::Deserialize;

use crate::error::Error;
use crate::principal::PrincipalKind;

/// Default number of errors shown in the run summary.
pub const DEFAULT_ERROR_DISPLAY_LIMIT: usize = 3;

/// Tunables for a reconciliation run.
///
/// Every field has a default, so an empty document deserializes to
/// [`ReconcileOptions::default`].
///
/// # Examples
///
/// ```
/// use admin_reconcile::{ReconcileOptions, PrincipalKind};
///
/// let options: ReconcileOptions =
///     serde_json::from_str(r#"{ "error_display_limit": 10 }"#).unwrap();
///
/// assert_eq!(options.error_display_limit, 10);
/// assert_eq!(options.probe_order, PrincipalKind::ALL.to_vec());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileOptions {
    /// How many errors the run summary prints. All errors are still
    /// collected in the result.
    pub error_display_limit: usize,
    /// Kinds tried, in order, when granting by bare object ID.
    pub probe_order: Vec<PrincipalKind>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            error_display_limit: DEFAULT_ERROR_DISPLAY_LIMIT,
            probe_order: PrincipalKind::ALL.to_vec(),
        }
    }
}

impl ReconcileOptions {
    /// Sets the error display limit.
    pub fn with_error_display_limit(mut self, limit: usize) -> Self {
        self.error_display_limit = limit;
        self
    }

    /// Sets the probing order.
    pub fn with_probe_order(mut self, order: impl Into<Vec<PrincipalKind>>) -> Self {
        self.probe_order = order.into();
        self
    }

    /// Checks that the options are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] if the probe order is empty or
    /// names a kind twice.
    pub fn validate(&self) -> Result<(), Error> {
        if self.probe_order.is_empty() {
            return Err(Error::InvalidOptions(
                "probe_order must name at least one principal kind".to_string(),
            ));
        }

        for (i, kind) in self.probe_order.iter().enumerate() {
            if self.probe_order[..i].contains(kind) {
                return Err(Error::InvalidOptions(format!(
                    "probe_order lists {kind} more than once"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ReconcileOptions::default();
        assert_eq!(options.error_display_limit, 3);
        assert_eq!(
            options.probe_order,
            vec![PrincipalKind::User, PrincipalKind::ServicePrincipal]
        );
        assert!(options.validate().is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        let options: ReconcileOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ReconcileOptions::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<ReconcileOptions>(r#"{"role": "Member"}"#).is_err());
    }

    #[test]
    fn rejects_empty_or_repeated_probe_order() {
        let empty = ReconcileOptions::default().with_probe_order(Vec::new());
        assert!(matches!(empty.validate(), Err(Error::InvalidOptions(_))));

        let repeated = ReconcileOptions::default()
            .with_probe_order(vec![PrincipalKind::User, PrincipalKind::User]);
        let err = repeated.validate().unwrap_err();
        assert!(err.to_string().contains("User more than once"), "got: {err}");
    }

    #[test]
    fn single_kind_probe_order_is_allowed() {
        let options =
            ReconcileOptions::default().with_probe_order([PrincipalKind::ServicePrincipal]);
        assert!(options.validate().is_ok());
    }
}
