//! In-memory audit trail recorder.

use std::cell::RefCell;

use super::{AuditEvent, AuditEventKind};
use crate::principal::PrincipalKind;

/// In-memory recorder for audit events.
///
/// Events are kept in the order they were recorded. Interior mutability
/// lets the reconciler and grant applier share one trail by reference.
///
/// # Example
///
/// ```
/// use admin_reconcile::audit::{AuditTrail, AuditEvent, AuditEventKind};
///
/// let trail = AuditTrail::new();
/// trail.record(AuditEvent::new("oid-1", AuditEventKind::Skipped, None));
///
/// assert_eq!(trail.events().len(), 1);
/// ```
#[derive(Debug)]
pub struct AuditTrail {
    events: RefCell<Vec<AuditEvent>>,
}

impl AuditTrail {
    /// Creates a new empty audit trail.
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
        }
    }

    /// Records an audit event.
    pub fn record(&self, event: AuditEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Returns a snapshot of all recorded events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.borrow().clone()
    }

    /// Returns the events recorded for `identifier`.
    pub fn events_for(&self, identifier: &str) -> Vec<AuditEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.identifier() == identifier)
            .cloned()
            .collect()
    }

    /// Returns the kinds tried for `identifier`, in attempt order.
    pub fn attempts_for(&self, identifier: &str) -> Vec<PrincipalKind> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.identifier() == identifier && e.kind() == AuditEventKind::GrantAttempt)
            .filter_map(AuditEvent::principal_kind)
            .collect()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
