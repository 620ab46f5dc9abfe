//! Converter variants and the static converter registry.
//!
//! A converter turns the whole raster into strokes, one work unit at a
//! time. The capability set is deliberately small: `work_unit` (do one
//! slice of the conversion, say whether to be called again), `cancel`
//! (drop any buffered progress), and `finalize` (flush buffered commands
//! on completion or cancellation). Preview rendering and settings panels
//! are host concerns and have no hook here.
//!
//! Variants are a closed enum dispatched with `enum_dispatch` rather than
//! trait objects; the host picks one through [`create`], the statically
//! compiled replacement for runtime plugin discovery.

pub mod scanline;
pub mod spiral;

use enum_dispatch::enum_dispatch;

use crate::errors::StrokeError;
use crate::stroke::{CommandSink, ConversionContext};

pub use scanline::ScanlineConverter;
pub use spiral::SpiralConverter;

/// One conversion strategy, advanced cooperatively by the session.
#[enum_dispatch]
pub trait Converter {
    /// Run one slice of the conversion, writing commands to `sink`.
    ///
    /// Returns `Ok(true)` if there is more work, `Ok(false)` when the
    /// conversion is complete. A single-shot converter does everything in
    /// its first unit and returns `Ok(false)`.
    fn work_unit(
        &mut self,
        ctx: &ConversionContext<'_>,
        sink: &mut dyn CommandSink,
    ) -> Result<bool, StrokeError>;

    /// Called by the session when cancellation is observed, before
    /// `finalize`. Converters drop buffered progress here.
    fn cancel(&mut self);

    /// Flush any buffered commands. Invoked exactly once, on transition
    /// into a terminal state; a no-op for converters that emit
    /// incrementally from `work_unit`.
    fn finalize(
        &mut self,
        ctx: &ConversionContext<'_>,
        sink: &mut dyn CommandSink,
    ) -> Result<(), StrokeError>;
}

/// The closed set of converter variants.
#[enum_dispatch(Converter)]
#[derive(Debug, Clone)]
pub enum ConverterKind {
    Scanline(ScanlineConverter),
    Spiral(SpiralConverter),
}

/// One row of the converter registry.
#[derive(Clone, Copy)]
pub struct ConverterEntry {
    /// Stable identifier, usable in host configuration.
    pub id: &'static str,
    /// Human-readable name for host UIs.
    pub name: &'static str,
    construct: fn() -> ConverterKind,
}

impl ConverterEntry {
    /// Construct a fresh converter with default settings.
    pub fn construct(&self) -> ConverterKind {
        (self.construct)()
    }
}

fn new_scanline() -> ConverterKind {
    ConverterKind::Scanline(ScanlineConverter::default())
}

fn new_spiral() -> ConverterKind {
    ConverterKind::Spiral(SpiralConverter::default())
}

/// Static converter table. Hosts enumerate this to populate their own
/// selection UI; nothing is discovered at runtime.
pub const REGISTRY: &[ConverterEntry] = &[
    ConverterEntry {
        id: "scanline",
        name: "Scanline (boustrophedon rows)",
        construct: new_scanline,
    },
    ConverterEntry {
        id: "spiral",
        name: "Spiral (center outward)",
        construct: new_spiral,
    },
];

/// Look up a converter by identifier and construct it.
pub fn create(id: &str) -> Option<ConverterKind> {
    REGISTRY
        .iter()
        .find(|entry| entry.id == id)
        .map(ConverterEntry::construct)
}
