//! The conversion session: a cooperative state machine around one
//! converter.
//!
//! The external driver (a timer tick, a background task loop) calls
//! [`ConversionSession::step`] repeatedly; the session observes
//! cancellation between work units, never inside one, and runs the
//! converter's `finalize` exactly once on the way into a terminal state.

use crate::converters::{Converter, ConverterKind};
use crate::errors::SessionError;
use crate::log::debug;
use crate::stroke::{CommandSink, ConversionContext};

/// Lifecycle of a conversion session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet started.
    Idle,
    /// Work units are being issued.
    Running,
    /// The converter reported no more work; finalize has run.
    Completed,
    /// Cancellation was observed between work units; finalize has run.
    Cancelled,
    /// A work unit or finalize failed; the command stream must be
    /// considered incomplete.
    Failed,
}

impl SessionState {
    /// True for states that accept no further work.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Cancelled | SessionState::Failed
        )
    }

    fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Completed => "completed",
            SessionState::Cancelled => "cancelled",
            SessionState::Failed => "failed",
        }
    }
}

/// Transient state of one conversion. Owns its converter; shares nothing
/// with other sessions, so independent sessions over different rasters
/// need no locking.
#[derive(Debug)]
pub struct ConversionSession {
    converter: ConverterKind,
    state: SessionState,
    cancel_requested: bool,
}

impl ConversionSession {
    /// Create an idle session around a converter.
    pub fn new(converter: ConverterKind) -> Self {
        ConversionSession {
            converter,
            state: SessionState::Idle,
            cancel_requested: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Move `Idle → Running`. Errors if the session already started.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyStarted { state: self.state.name() });
        }
        debug!("session started");
        self.state = SessionState::Running;
        Ok(())
    }

    /// Request cooperative cancellation.
    ///
    /// Takes effect at the top of the next [`step`](Self::step); the work
    /// unit currently in flight (if the driver is mid-call elsewhere) is
    /// never preempted.
    pub fn cancel(&mut self) {
        self.cancel_requested = true;
    }

    /// Issue one work unit and apply the resulting transition.
    ///
    /// Returns the state after the step: `Running` while the converter
    /// wants more calls, a terminal state otherwise. Stepping a session
    /// that is not `Running` is an error. On a work-unit or finalize
    /// failure the session moves to `Failed` and the error propagates;
    /// the partially written command stream must be discarded.
    pub fn step(
        &mut self,
        ctx: &ConversionContext<'_>,
        sink: &mut dyn CommandSink,
    ) -> Result<SessionState, SessionError> {
        if self.state != SessionState::Running {
            return Err(SessionError::NotRunning { state: self.state.name() });
        }

        if self.cancel_requested {
            debug!("cancellation observed");
            self.converter.cancel();
            self.finish(SessionState::Cancelled, ctx, sink)?;
            return Ok(self.state);
        }

        match self.converter.work_unit(ctx, sink) {
            Ok(true) => Ok(SessionState::Running),
            Ok(false) => {
                self.finish(SessionState::Completed, ctx, sink)?;
                Ok(self.state)
            }
            Err(e) => {
                self.state = SessionState::Failed;
                Err(e.into())
            }
        }
    }

    /// Drive the session until it reaches a terminal state. Starts it
    /// first if still idle.
    pub fn run_to_completion(
        &mut self,
        ctx: &ConversionContext<'_>,
        sink: &mut dyn CommandSink,
    ) -> Result<SessionState, SessionError> {
        if self.state == SessionState::Idle {
            self.start()?;
        }
        loop {
            let state = self.step(ctx, sink)?;
            if state.is_terminal() {
                return Ok(state);
            }
        }
    }

    fn finish(
        &mut self,
        terminal: SessionState,
        ctx: &ConversionContext<'_>,
        sink: &mut dyn CommandSink,
    ) -> Result<(), SessionError> {
        match self.converter.finalize(ctx, sink) {
            Ok(()) => {
                debug!(state = terminal.name(), "session finished");
                self.state = terminal;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Failed;
                Err(e.into())
            }
        }
    }
}
