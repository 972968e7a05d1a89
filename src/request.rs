/// The identifiers requested for one reconciliation run.
///
/// Identifiers arrive through two channels:
/// - resolve-then-grant identifiers (UPNs, object IDs, application IDs), from
///   a comma-separated list and/or a plain list;
/// - object-ID-only identifiers, granted by probing without resolution.
///
/// Duplicates are kept; the existing-grant index deals with them.
///
/// # Examples
///
/// ```
/// use admin_reconcile::AdminRequest;
///
/// let request = AdminRequest::new()
///     .with_csv(" a@contoso.com, ,b@contoso.com ")
///     .with_identifiers(["c@contoso.com"])
///     .with_object_ids(["12345678-1234-1234-1234-123456789012"]);
///
/// assert_eq!(request.resolve(), ["a@contoso.com", "b@contoso.com", "c@contoso.com"]);
/// assert_eq!(request.total(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminRequest {
    csv: Vec<String>,
    listed: Vec<String>,
    object_ids: Vec<String>,
}

impl AdminRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds identifiers from a comma-separated list.
    ///
    /// Entries are trimmed and empty entries dropped.
    pub fn with_csv(mut self, csv: &str) -> Self {
        self.csv.extend(parse_csv(csv));
        self
    }

    /// Adds resolve-then-grant identifiers.
    pub fn with_identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.listed.extend(identifiers.into_iter().map(Into::into));
        self
    }

    /// Adds object-ID-only identifiers.
    pub fn with_object_ids<I, S>(mut self, object_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.object_ids.extend(object_ids.into_iter().map(Into::into));
        self
    }

    /// Returns resolve-then-grant identifiers: CSV entries first, then listed ones.
    pub fn resolve(&self) -> Vec<String> {
        self.csv.iter().chain(&self.listed).cloned().collect()
    }

    /// Returns object-ID-only identifiers.
    pub fn object_ids(&self) -> &[String] {
        &self.object_ids
    }

    /// Returns the number of requested identifiers across both channels.
    pub fn total(&self) -> usize {
        self.csv.len() + self.listed.len() + self.object_ids.len()
    }

    /// Returns `true` if nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_csv(csv: &str) -> impl Iterator<Item = String> + '_ {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
