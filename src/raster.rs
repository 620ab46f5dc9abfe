//! Intensity sampling over a transformed grayscale raster.

use glam::DVec2;
use image::GrayImage;

use crate::types::NumericError;

/// Blank intensity. Boxes that miss the raster entirely sample as fully
/// light, so callers treat raster-bounds misses and margin misses the
/// same way (nothing is drawn there).
pub const BLANK: f64 = 255.0;

/// A read-only raster the rasterizer samples while walking a stroke.
///
/// Implementations map physical coordinates (millimeters, origin at the
/// image center) to image-sample space and answer box-average intensity
/// queries in `[0, 255]` (0 = fully dark, 255 = fully light).
///
/// Bound once per conversion session; never swapped mid-session.
pub trait RasterSource {
    /// Average intensity of the raster under the axis-aligned physical
    /// box `[box_min, box_max]`. Pure and deterministic; a box fully
    /// outside the raster returns [`BLANK`].
    fn sample(&self, box_min: DVec2, box_max: DVec2) -> f64;

    /// Source image width in pixels.
    fn width(&self) -> u32;

    /// Source image height in pixels.
    fn height(&self) -> u32;

    /// Millimeters per pixel along x.
    fn scale_x(&self) -> f64;

    /// Millimeters per pixel along y. Negative by convention: pixel rows
    /// grow downward while physical y grows upward.
    fn scale_y(&self) -> f64;
}

/// A grayscale image plus a physical→pixel transform with its origin at
/// the image center.
#[derive(Debug, Clone)]
pub struct TransformedRaster {
    image: GrayImage,
    scale_x: f64,
    scale_y: f64,
}

impl TransformedRaster {
    /// Wrap an already-decoded grayscale buffer.
    ///
    /// `scale_x`/`scale_y` are millimeters per pixel and must be finite
    /// and nonzero; `scale_y` is normally negative (see
    /// [`RasterSource::scale_y`]).
    pub fn try_new(image: GrayImage, scale_x: f64, scale_y: f64) -> Result<Self, NumericError> {
        for s in [scale_x, scale_y] {
            if s.is_nan() {
                return Err(NumericError::NaN);
            } else if s.is_infinite() {
                return Err(NumericError::Infinite);
            } else if s == 0.0 {
                return Err(NumericError::Zero);
            }
        }
        Ok(TransformedRaster { image, scale_x, scale_y })
    }

    /// Map a physical coordinate to fractional pixel coordinates.
    #[inline]
    fn to_pixel(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            self.image.width() as f64 * 0.5 + p.x / self.scale_x,
            self.image.height() as f64 * 0.5 + p.y / self.scale_y,
        )
    }
}

impl RasterSource for TransformedRaster {
    fn sample(&self, box_min: DVec2, box_max: DVec2) -> f64 {
        let a = self.to_pixel(box_min);
        let b = self.to_pixel(box_max);
        // A negative scale flips the box; re-order per axis.
        let (px_min_x, px_max_x) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
        let (px_min_y, px_max_y) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };

        let x0 = px_min_x.floor().max(0.0) as i64;
        let y0 = px_min_y.floor().max(0.0) as i64;
        let x1 = (px_max_x.ceil() as i64).min(self.image.width() as i64);
        let y1 = (px_max_y.ceil() as i64).min(self.image.height() as i64);
        if x0 >= x1 || y0 >= y1 {
            return BLANK;
        }

        let mut sum: u64 = 0;
        let mut count: u64 = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                sum += u64::from(self.image.get_pixel(x as u32, y as u32).0[0]);
                count += 1;
            }
        }
        sum as f64 / count as f64
    }

    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn scale_x(&self) -> f64 {
        self.scale_x
    }

    fn scale_y(&self) -> f64 {
        self.scale_y
    }
}

/// A raster with the same intensity everywhere, unbounded in extent.
///
/// Useful for calibration plots and tests; a constant-0 source draws
/// everywhere inside the margins, a constant-255 source draws nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRaster(pub f64);

impl RasterSource for ConstantRaster {
    fn sample(&self, _box_min: DVec2, _box_max: DVec2) -> f64 {
        self.0
    }

    fn width(&self) -> u32 {
        0
    }

    fn height(&self) -> u32 {
        0
    }

    fn scale_x(&self) -> f64 {
        1.0
    }

    fn scale_y(&self) -> f64 {
        -1.0
    }
}
