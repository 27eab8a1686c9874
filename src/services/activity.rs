//! Fire-and-forget audit trail.
//!
//! The recorder must never block or fail a business operation: the trait is
//! synchronous from the caller's point of view and implementations push the
//! actual write onto a background task, logging failures instead of
//! propagating them.

use crate::models::ActivityKind;

pub trait ActivityRecorder: Send + Sync {
    fn record(
        &self,
        user_id: Option<&str>,
        kind: ActivityKind,
        description: &str,
        entity_type: &str,
        entity_id: &str,
    );
}

/// Recorder that drops everything; used where auditing is switched off.
pub struct NoopRecorder;

impl ActivityRecorder for NoopRecorder {
    fn record(&self, _: Option<&str>, _: ActivityKind, _: &str, _: &str, _: &str) {}
}
