//! Single-shot spiral converter: one Archimedean spiral, center outward.

use std::f64::consts::TAU;

use glam::dvec2;

use crate::errors::StrokeError;
use crate::log::debug;
use crate::stroke::{CommandSink, ConversionContext, rasterize_stroke};

use super::Converter;

/// Draws an Archimedean spiral from the margin center out to the radius
/// enclosing the margin corners, rasterized as short chords.
///
/// Chords are kept to roughly one sampling pitch, so near the corners —
/// where the spiral repeatedly leaves and re-enters the margins — the
/// rasterizer's single-exit truncation costs at most one sample per
/// chord.
///
/// Single-shot: the whole spiral is emitted by the first work unit.
#[derive(Debug, Clone, Default)]
pub struct SpiralConverter {
    done: bool,
}

impl Converter for SpiralConverter {
    fn work_unit(
        &mut self,
        ctx: &ConversionContext<'_>,
        sink: &mut dyn CommandSink,
    ) -> Result<bool, StrokeError> {
        if self.done {
            return Ok(false);
        }

        let center = ctx.margins.center();
        let max_r = (ctx.margins.size() * 0.5).length();
        let pitch = ctx.params.step_size();
        debug!(max_r, pitch, "spiral conversion");

        // r grows by one pitch per revolution; the angle advances so each
        // chord is about one pitch long.
        let mut angle: f64 = 0.0;
        let mut prev = center;
        while angle * pitch / TAU < max_r {
            let r = angle * pitch / TAU;
            let p = center + dvec2(angle.cos(), angle.sin()) * r;
            rasterize_stroke(prev, p, ctx, sink)?;
            prev = p;
            // At tiny radii a pitch-length chord would skip whole turns;
            // cap the angular advance at a quarter turn.
            let advance = if r > pitch { pitch / r } else { TAU / 4.0 };
            angle += advance;
        }

        self.done = true;
        Ok(false)
    }

    fn cancel(&mut self) {
        // Single-shot and incremental; nothing buffered to drop.
    }

    fn finalize(
        &mut self,
        _ctx: &ConversionContext<'_>,
        _sink: &mut dyn CommandSink,
    ) -> Result<(), StrokeError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::margins::Margins;
    use crate::raster::ConstantRaster;
    use crate::types::{Command, ConversionParameters, PenState};

    fn ctx(source: &ConstantRaster) -> ConversionContext<'_> {
        ConversionContext::new(
            source,
            Margins::try_new(-50.0, -50.0, 50.0, 50.0).unwrap(),
            ConversionParameters::try_new(5.0, 128.0).unwrap(),
        )
    }

    #[test]
    fn single_shot_finishes_in_one_unit() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark);
        let mut conv = SpiralConverter::default();
        let mut out: Vec<Command> = Vec::new();
        assert!(!conv.work_unit(&ctx, &mut out).unwrap());
        assert!(!out.is_empty());

        // A second unit is a no-op.
        let len = out.len();
        assert!(!conv.work_unit(&ctx, &mut out).unwrap());
        assert_eq!(out.len(), len);
    }

    #[test]
    fn dark_raster_draws_inside_margins() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark);
        let mut conv = SpiralConverter::default();
        let mut out: Vec<Command> = Vec::new();
        conv.work_unit(&ctx, &mut out).unwrap();
        assert!(out.iter().any(|c| c.pen == PenState::Down));
        // Every pen-down command lands inside the drawable region.
        for c in out.iter().filter(|c| c.pen == PenState::Down) {
            assert!(ctx.margins.contains(c.point), "pen down outside margins: {c}");
        }
    }

    #[test]
    fn spiral_reaches_past_inscribed_radius() {
        let dark = ConstantRaster(0.0);
        let ctx = ctx(&dark);
        let mut conv = SpiralConverter::default();
        let mut out: Vec<Command> = Vec::new();
        conv.work_unit(&ctx, &mut out).unwrap();
        let far = out
            .iter()
            .map(|c| c.point.length())
            .fold(0.0f64, f64::max);
        // The spiral must cover out to the corners' radius, not stop at
        // the inscribed circle.
        assert!(far > 50.0);
    }
}
