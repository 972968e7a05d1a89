//! Audit trail of per-identifier reconciliation steps.
//!
//! This module provides:
//! - `AuditEvent`: one step taken for one requested identifier
//! - `AuditTrail`: in-memory, ordered recorder for those steps
//!
//! Events carry identifiers and error text only. They never carry
//! credentials.

mod event;
mod trail;

pub use event::{AuditEvent, AuditEventKind};
pub use trail::AuditTrail;
