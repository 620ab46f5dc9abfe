//! penpath converts a continuous-tone raster image into an ordered
//! sequence of pen-up/pen-down motion commands for a drawing robot,
//! constrained to a rectangular drawable region.
//!
//! The crate is organized leaves-first:
//! - `raster`: box-average intensity sampling over a transformed image
//! - `margins`: the drawable rectangle, inside test and boundary clipping
//! - `stroke`: the stroke rasterizer, the primitive everything builds on
//! - `converters`: whole-image conversion strategies and their registry
//! - `session`: the cooperative work-unit state machine driving one
//!   conversion
//!
//! The output is an abstract [`Command`] stream; encoding it into a
//! machine-control text format, previewing it, or persisting it is the
//! host application's job.
//!
//! ```
//! use glam::dvec2;
//! use penpath::{
//!     ConversionParameters, ConversionContext, Margins,
//!     raster::ConstantRaster, stroke::rasterize_stroke,
//! };
//!
//! let source = ConstantRaster(0.0); // fully dark: draw everywhere
//! let ctx = ConversionContext::new(
//!     &source,
//!     Margins::try_new(0.0, 0.0, 100.0, 100.0)?,
//!     ConversionParameters::try_new(10.0, 128.0)?,
//! );
//! let mut commands = Vec::new();
//! rasterize_stroke(dvec2(10.0, 50.0), dvec2(90.0, 50.0), &ctx, &mut commands)?;
//! assert!(commands.len() > 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod converters;
pub mod errors;
pub mod log;
pub mod margins;
pub mod raster;
pub mod session;
pub mod stroke;
pub mod types;

pub use converters::{Converter, ConverterKind};
pub use errors::{SessionError, SinkError, StrokeError};
pub use margins::Margins;
pub use raster::{RasterSource, TransformedRaster};
pub use session::{ConversionSession, SessionState};
pub use stroke::{CommandSink, ConversionContext, rasterize_stroke};
pub use types::{Command, ConversionParameters, NumericError, PenState};

/// Convert a whole raster with the named registered converter, collecting
/// the command stream in memory.
///
/// Convenience wrapper over [`ConversionSession`] for hosts that do not
/// need incremental driving. Returns `None` if `converter_id` is not in
/// the registry.
pub fn convert(
    converter_id: &str,
    ctx: &ConversionContext<'_>,
) -> Option<Result<Vec<Command>, SessionError>> {
    let converter = converters::create(converter_id)?;
    let mut session = ConversionSession::new(converter);
    let mut commands: Vec<Command> = Vec::new();
    Some(
        session
            .run_to_completion(ctx, &mut commands)
            .map(|_| commands),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ConstantRaster;

    #[test]
    fn convert_by_registered_id() {
        let source = ConstantRaster(0.0);
        let ctx = ConversionContext::new(
            &source,
            Margins::try_new(0.0, 0.0, 50.0, 20.0).unwrap(),
            ConversionParameters::try_new(5.0, 128.0).unwrap(),
        );
        let commands = convert("scanline", &ctx).unwrap().unwrap();
        assert!(!commands.is_empty());
    }

    #[test]
    fn convert_unknown_id() {
        let source = ConstantRaster(0.0);
        let ctx = ConversionContext::new(
            &source,
            Margins::try_new(0.0, 0.0, 50.0, 20.0).unwrap(),
            ConversionParameters::try_new(5.0, 128.0).unwrap(),
        );
        assert!(convert("nope", &ctx).is_none());
    }
}
