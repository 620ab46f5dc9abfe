//! Error types, one enum per pipeline stage.
//!
//! Parameter and geometry validation errors live in
//! [`crate::types::NumericError`]; the enums here cover failures that can
//! only surface once a conversion is underway.

use thiserror::Error;

/// Failure reported by a [`CommandSink`](crate::stroke::CommandSink).
///
/// A sink failure is fatal for the session: commands carry physical
/// meaning, and a half-delivered stream is worse than none, so there is
/// no retry path.
#[derive(Error, Debug)]
#[error("command sink failed: {reason}")]
pub struct SinkError {
    pub reason: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SinkError {
    /// Create a sink error from a plain message.
    pub fn new(reason: impl Into<String>) -> Self {
        SinkError { reason: reason.into(), source: None }
    }

    /// Create a sink error wrapping an underlying transport error.
    pub fn with_source(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SinkError {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors raised while rasterizing a single stroke.
#[derive(Error, Debug)]
pub enum StrokeError {
    /// A margin transition was detected but the segment intersects no
    /// margin edge. Only reachable through floating-point degeneracy;
    /// surfaced rather than papered over because the clip point becomes a
    /// physical pen move.
    #[error("stroke crossed the margin boundary but no clip point was found")]
    NoBoundaryCrossing,

    /// The command sink rejected a command; the stroke is aborted.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Errors raised by the conversion session state machine.
#[derive(Error, Debug)]
pub enum SessionError {
    /// `start` was called on a session that already left `Idle`.
    #[error("session already started (state: {state})")]
    AlreadyStarted { state: &'static str },

    /// `step` was called on a session that is not running.
    #[error("session is not running (state: {state})")]
    NotRunning { state: &'static str },

    /// A work unit or finalize failed; the session is now `Failed`.
    #[error(transparent)]
    Stroke(#[from] StrokeError),
}
