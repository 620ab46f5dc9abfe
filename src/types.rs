//! Core value types for the conversion pipeline.
//!
//! Design goals:
//! - Validation at construction: invalid parameters are unrepresentable
//!   downstream, so the rasterizer never has to re-check them.
//! - Commands are plain ordered values; their sequence is the output.

use std::fmt;

use glam::DVec2;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative or zero when strictly positive required
    NotPositive,
    /// Rectangle minimum is not strictly below its maximum
    InvertedRect,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::NotPositive => write!(f, "value is not strictly positive"),
            NumericError::InvertedRect => write!(f, "rectangle min is not below max"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Binary tool-engagement state. `Down` means the pen is touching the
/// surface and drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    Up,
    Down,
}

/// One element of the output motion stream: move to `point` with the pen
/// in state `pen`.
///
/// Order is load-bearing. The plotter executes commands strictly in
/// sequence, so replaying a stream out of order draws a different picture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    /// Target position in physical units (millimeters).
    pub point: DVec2,
    /// Pen state to hold while travelling to `point`.
    pub pen: PenState,
}

impl Command {
    #[inline]
    pub fn new(point: DVec2, pen: PenState) -> Self {
        Command { point, pen }
    }

    /// Pen-up move, used for repositioning without drawing.
    #[inline]
    pub fn up(point: DVec2) -> Self {
        Command { point, pen: PenState::Up }
    }

    /// Pen-down move, drawing a line to `point`.
    #[inline]
    pub fn down(point: DVec2) -> Self {
        Command { point, pen: PenState::Down }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pen = match self.pen {
            PenState::Up => "up",
            PenState::Down => "down",
        };
        write!(f, "{} ({:.2}, {:.2})", pen, self.point.x, self.point.y)
    }
}

/// Sampling parameters for one conversion.
///
/// `step_size` is the physical sampling pitch along a stroke, in
/// millimeters. `channel_cutoff` is the intensity threshold: a sampled
/// intensity at or above the cutoff lifts the pen, below it the pen draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionParameters {
    step_size: f64,
    channel_cutoff: f64,
}

impl ConversionParameters {
    /// Create parameters with validation.
    ///
    /// Rejects a non-finite or non-positive `step_size` and a non-finite
    /// `channel_cutoff`. Rejection happens here, before any session
    /// exists, so downstream code never sees an invalid pitch.
    pub fn try_new(step_size: f64, channel_cutoff: f64) -> Result<Self, NumericError> {
        if step_size.is_nan() || channel_cutoff.is_nan() {
            Err(NumericError::NaN)
        } else if step_size.is_infinite() || channel_cutoff.is_infinite() {
            Err(NumericError::Infinite)
        } else if step_size <= 0.0 {
            Err(NumericError::NotPositive)
        } else {
            Ok(ConversionParameters { step_size, channel_cutoff })
        }
    }

    /// Sampling pitch along a stroke, in millimeters. Always finite and
    /// strictly positive.
    #[inline]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Intensity threshold in `[0, 255]` space separating "draw" from
    /// "don't draw".
    #[inline]
    pub fn channel_cutoff(&self) -> f64 {
        self.channel_cutoff
    }

    /// Whether a sampled intensity lifts the pen.
    #[inline]
    pub fn lifts_pen(&self, intensity: f64) -> bool {
        intensity >= self.channel_cutoff
    }
}
