//! The stroke rasterizer: one straight pen motion, sampled and clipped.
//!
//! This is the primitive every converter is built on. It walks the
//! segment `p0 → p1` at the configured pitch, thresholds the sampled
//! intensity into a pen state, and emits boundary-crossing waypoints
//! whenever the stroke enters or leaves the drawable margins.

use glam::{DVec2, dvec2};

use crate::errors::{SinkError, StrokeError};
use crate::margins::Margins;
use crate::raster::{BLANK, RasterSource};
use crate::types::{Command, ConversionParameters, PenState};

/// Ordered, append-only receiver of [`Command`] values.
///
/// Implementations must preserve relative order; the physical plotter
/// executes the stream as a total order. A push failure is fatal for the
/// session (see [`SinkError`]).
pub trait CommandSink {
    fn push(&mut self, cmd: Command) -> Result<(), SinkError>;
}

/// The canonical in-memory sink.
impl CommandSink for Vec<Command> {
    fn push(&mut self, cmd: Command) -> Result<(), SinkError> {
        Vec::push(self, cmd);
        Ok(())
    }
}

/// Everything a converter work unit needs to rasterize strokes: the bound
/// raster, the drawable margins, and the sampling parameters.
///
/// Built per session and passed by reference into each work unit; no
/// state is shared across sessions.
#[derive(Clone, Copy)]
pub struct ConversionContext<'a> {
    pub source: &'a dyn RasterSource,
    pub margins: Margins,
    pub params: ConversionParameters,
}

impl<'a> ConversionContext<'a> {
    pub fn new(
        source: &'a dyn RasterSource,
        margins: Margins,
        params: ConversionParameters,
    ) -> Self {
        ConversionContext { source, margins, params }
    }
}

/// Drag the pen from `p0` to `p1`, sampling the raster every
/// `step_size` millimeters and emitting commands to `sink`.
///
/// Behavior, in order:
/// - a pen-up command at `p0` is always emitted first (the pen is lifted
///   before repositioning to the stroke start);
/// - each interpolated sample inside the margins is thresholded against
///   the channel cutoff; samples outside the margins read as blank, so
///   nothing is ever drawn outside the drawable region;
/// - when a sample's inside-state differs from the previous sample's, the
///   exact boundary crossing is emitted twice — once with the old pen
///   state, once with the new — making the margin edge a hard pen
///   transition rather than an interpolated one;
/// - the walk stops at the first inside→outside transition: a stroke is
///   assumed to leave the drawable region at most once, and one that
///   re-enters later is truncated at its first exit;
/// - a pen-up command at the nominal end `p1` is always emitted last,
///   wherever the walk stopped.
///
/// For a degenerate stroke (`p0 == p1`) the step count clamps to 1 and a
/// minimal framed sequence is produced. A sink failure aborts the stroke
/// immediately; no partial-command retry.
pub fn rasterize_stroke(
    p0: DVec2,
    p1: DVec2,
    ctx: &ConversionContext<'_>,
    sink: &mut dyn CommandSink,
) -> Result<(), StrokeError> {
    let half = ctx.params.step_size() / 2.0;
    let half_box = dvec2(half, half);
    let delta = p1 - p0;
    let steps = (delta.length() / ctx.params.step_size()).round().max(1.0);

    let mut was_inside = ctx.margins.contains(p0);
    // Seeds the clip pair if the very first sample crosses the boundary.
    // Outside the margins the pen state before the stroke is taken as
    // down, matching plotter behavior of arriving with the tool parked.
    let mut old_pen = if was_inside {
        threshold(ctx.source.sample(p0 - half_box, p0 + half_box), &ctx.params)
    } else {
        PenState::Down
    };
    let mut prev = p0;

    sink.push(Command::up(p0))?;

    for b in 0..=(steps as u64) {
        let p = p0 + delta * (b as f64 / steps);
        let inside = ctx.margins.contains(p);
        let v = if inside {
            ctx.source.sample(p - half_box, p + half_box)
        } else {
            BLANK
        };
        let pen = threshold(v, &ctx.params);

        if inside != was_inside {
            let clip = ctx
                .margins
                .clip(prev, p)
                .ok_or(StrokeError::NoBoundaryCrossing)?;
            sink.push(Command::new(clip, old_pen))?;
            sink.push(Command::new(clip, pen))?;
        }
        sink.push(Command::new(p, pen))?;

        if was_inside && !inside {
            break;
        }
        was_inside = inside;
        prev = p;
        old_pen = pen;
    }

    sink.push(Command::up(p1))?;
    Ok(())
}

#[inline]
fn threshold(intensity: f64, params: &ConversionParameters) -> PenState {
    if params.lifts_pen(intensity) {
        PenState::Up
    } else {
        PenState::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ConstantRaster;
    use glam::dvec2;

    fn ctx(source: &ConstantRaster, step: f64, cutoff: f64) -> ConversionContext<'_> {
        ConversionContext::new(
            source,
            Margins::try_new(0.0, 0.0, 100.0, 100.0).unwrap(),
            ConversionParameters::try_new(step, cutoff).unwrap(),
        )
    }

    fn run(p0: DVec2, p1: DVec2, ctx: &ConversionContext<'_>) -> Vec<Command> {
        let mut out = Vec::new();
        rasterize_stroke(p0, p1, ctx, &mut out).unwrap();
        out
    }

    #[test]
    fn endpoints_are_always_pen_up() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark, 10.0, 128.0);
        let out = run(dvec2(10.0, 10.0), dvec2(90.0, 10.0), &ctx);
        assert_eq!(out.first().unwrap().pen, PenState::Up);
        assert_eq!(out.last().unwrap().pen, PenState::Up);
    }

    #[test]
    fn all_blank_raster_never_lowers_pen() {
        let blank = ConstantRaster(255.0);
        let ctx = ctx(&blank, 5.0, 128.0);
        let out = run(dvec2(10.0, 50.0), dvec2(90.0, 50.0), &ctx);
        assert!(out.iter().all(|c| c.pen == PenState::Up));
    }

    #[test]
    fn all_dark_raster_draws_every_interior_sample() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark, 5.0, 128.0);
        let out = run(dvec2(10.0, 50.0), dvec2(90.0, 50.0), &ctx);
        // Only the two framing commands are up.
        let ups = out.iter().filter(|c| c.pen == PenState::Up).count();
        assert_eq!(ups, 2);
        assert!(out[1..out.len() - 1].iter().all(|c| c.pen == PenState::Down));
    }

    #[test]
    fn step_count_law() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark, 10.0, 128.0);
        // Distance 80, pitch 10: 8 steps, samples b=0..=8, plus framing.
        let out = run(dvec2(10.0, 50.0), dvec2(90.0, 50.0), &ctx);
        assert_eq!(out.len(), 1 + 9 + 1);
    }

    #[test]
    fn step_count_rounds_to_nearest() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark, 10.0, 128.0);
        // Distance 84 rounds to 8 steps, distance 86 to 9.
        let out = run(dvec2(0.0, 50.0), dvec2(84.0, 50.0), &ctx);
        assert_eq!(out.len(), 1 + 9 + 1);
        let out = run(dvec2(0.0, 50.0), dvec2(86.0, 50.0), &ctx);
        assert_eq!(out.len(), 1 + 10 + 1);
    }

    #[test]
    fn degenerate_stroke_clamps_to_one_step() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark, 10.0, 128.0);
        let p = dvec2(50.0, 50.0);
        let out = run(p, p, &ctx);
        // Framing up, two coincident samples (b=0 and b=1), trailing up.
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], Command::up(p));
        assert_eq!(out[3], Command::up(p));
        assert!(out[1..3].iter().all(|c| c.point == p));
    }

    #[test]
    fn determinism() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark, 7.0, 100.0);
        let a = run(dvec2(-10.0, 50.0), dvec2(110.0, 50.0), &ctx);
        let b = run(dvec2(-10.0, 50.0), dvec2(110.0, 50.0), &ctx);
        assert_eq!(a, b);
    }

    #[test]
    fn boundary_crossing_emits_clip_pair() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark, 10.0, 128.0);
        // Starts outside the left margin, ends inside.
        let out = run(dvec2(-20.0, 50.0), dvec2(40.0, 50.0), &ctx);
        let clip = dvec2(0.0, 50.0);
        let at_clip: Vec<&Command> = out.iter().filter(|c| c.point == clip).collect();
        // The clip pair plus the b=2 sample that lands exactly on x=0.
        assert_eq!(at_clip.len(), 3);
        let idx = out.iter().position(|c| c.point == clip).unwrap();
        // Old pen state (up, from the blank outside samples) then the new
        // drawing state at the same waypoint.
        assert_eq!(out[idx].pen, PenState::Up);
        assert_eq!(out[idx + 1].pen, PenState::Down);
        assert!(ctx.margins.contains(clip));
    }

    #[test]
    fn leaving_margins_stops_early() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark, 10.0, 128.0);
        // Starts inside, exits through the right margin at x=100, nominal
        // end far beyond.
        let out = run(dvec2(50.0, 50.0), dvec2(250.0, 50.0), &ctx);
        // After the first outside sample the walk stops; only the
        // trailing framing command reaches past the boundary.
        let beyond: Vec<&Command> = out.iter().filter(|c| c.point.x > 100.0).collect();
        assert_eq!(beyond.len(), 2); // first outside sample + trailing up
        assert_eq!(*beyond.last().unwrap(), &Command::up(dvec2(250.0, 50.0)));
    }

    #[test]
    fn sink_failure_aborts_stroke() {
        struct FailingSink {
            accepted: usize,
            budget: usize,
        }
        impl CommandSink for FailingSink {
            fn push(&mut self, _cmd: Command) -> Result<(), SinkError> {
                if self.accepted == self.budget {
                    return Err(SinkError::new("transport closed"));
                }
                self.accepted += 1;
                Ok(())
            }
        }

        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark, 10.0, 128.0);
        let mut sink = FailingSink { accepted: 0, budget: 3 };
        let err = rasterize_stroke(dvec2(10.0, 50.0), dvec2(90.0, 50.0), &ctx, &mut sink)
            .unwrap_err();
        assert!(matches!(err, StrokeError::Sink(_)));
        assert_eq!(sink.accepted, 3);
    }
}
