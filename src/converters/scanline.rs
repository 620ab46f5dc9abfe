//! Iterative scanline converter: one horizontal pass per work unit.

use glam::dvec2;

use crate::errors::StrokeError;
use crate::log::debug;
use crate::stroke::{CommandSink, ConversionContext, rasterize_stroke};

use super::Converter;

/// Sweeps the margins bottom to top in horizontal rows, alternating
/// direction every row (boustrophedon) so the pen never travels back
/// across the page unnecessarily.
///
/// One row per work unit, so the driver can interleave preview updates
/// and observe cancellation between rows.
#[derive(Debug, Clone)]
pub struct ScanlineConverter {
    /// Row spacing as a multiple of the sampling pitch.
    spacing_factor: f64,
    next_row: u64,
}

impl ScanlineConverter {
    /// `spacing_factor` scales the sampling pitch into the gap between
    /// rows; values below 1.0 overlap sampling boxes, values above leave
    /// white gaps between passes.
    pub fn new(spacing_factor: f64) -> Self {
        ScanlineConverter {
            spacing_factor: if spacing_factor > 0.0 { spacing_factor } else { 1.0 },
            next_row: 0,
        }
    }

    fn row_spacing(&self, ctx: &ConversionContext<'_>) -> f64 {
        ctx.params.step_size() * self.spacing_factor
    }
}

impl Default for ScanlineConverter {
    fn default() -> Self {
        ScanlineConverter::new(1.0)
    }
}

impl Converter for ScanlineConverter {
    fn work_unit(
        &mut self,
        ctx: &ConversionContext<'_>,
        sink: &mut dyn CommandSink,
    ) -> Result<bool, StrokeError> {
        let spacing = self.row_spacing(ctx);
        let y = ctx.margins.min_y() + self.next_row as f64 * spacing;
        if y > ctx.margins.max_y() {
            return Ok(false);
        }

        // Even rows run left to right, odd rows come back.
        let (x0, x1) = if self.next_row % 2 == 0 {
            (ctx.margins.min_x(), ctx.margins.max_x())
        } else {
            (ctx.margins.max_x(), ctx.margins.min_x())
        };
        debug!(row = self.next_row, y, "scanline row");
        rasterize_stroke(dvec2(x0, y), dvec2(x1, y), ctx, sink)?;

        self.next_row += 1;
        Ok(ctx.margins.min_y() + self.next_row as f64 * spacing <= ctx.margins.max_y())
    }

    fn cancel(&mut self) {
        // Emits incrementally; nothing buffered to drop.
    }

    fn finalize(
        &mut self,
        _ctx: &ConversionContext<'_>,
        _sink: &mut dyn CommandSink,
    ) -> Result<(), StrokeError> {
        Ok(())
    }
}
