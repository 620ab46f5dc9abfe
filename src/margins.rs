//! The drawable rectangle and segment clipping against it.

use glam::{DVec2, dvec2};

use crate::types::NumericError;

/// Axis-aligned drawable region of the physical surface, in millimeters.
///
/// Fixed for the duration of one conversion. All four edges are part of
/// the drawable region (`contains` is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Margins {
    /// Create margins with validation.
    ///
    /// Rejects NaN/infinite bounds and rectangles where a minimum is not
    /// strictly below its maximum.
    pub fn try_new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, NumericError> {
        let vals = [min_x, min_y, max_x, max_y];
        if vals.iter().any(|v| v.is_nan()) {
            Err(NumericError::NaN)
        } else if vals.iter().any(|v| v.is_infinite()) {
            Err(NumericError::Infinite)
        } else if min_x >= max_x || min_y >= max_y {
            Err(NumericError::InvertedRect)
        } else {
            Ok(Margins { min_x, min_y, max_x, max_y })
        }
    }

    #[inline]
    pub fn min_x(&self) -> f64 { self.min_x }
    #[inline]
    pub fn min_y(&self) -> f64 { self.min_y }
    #[inline]
    pub fn max_x(&self) -> f64 { self.max_x }
    #[inline]
    pub fn max_y(&self) -> f64 { self.max_y }

    /// Center of the drawable region.
    #[inline]
    pub fn center(&self) -> DVec2 {
        dvec2((self.min_x + self.max_x) * 0.5, (self.min_y + self.max_y) * 0.5)
    }

    /// Width and height of the drawable region.
    #[inline]
    pub fn size(&self) -> DVec2 {
        dvec2(self.max_x - self.min_x, self.max_y - self.min_y)
    }

    /// True iff `p` is inside the drawable region, edges included.
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Intersection of the segment `p0 → p1` with the margin boundary.
    ///
    /// Intended for segments where exactly one endpoint is inside: the
    /// caller detects an inside-state transition and asks where it
    /// happened. Each of the four edge lines is tested for a parametric
    /// crossing whose hit point lies within the edge's span; the crossing
    /// nearest `p0` (smallest `t`) wins, which disambiguates
    /// corner-grazing segments that cut two edge lines.
    ///
    /// Returns `None` if the segment crosses no edge span, which cannot
    /// happen for a true transition outside floating-point degeneracy.
    pub fn clip(&self, p0: DVec2, p1: DVec2) -> Option<DVec2> {
        let d = p1 - p0;
        let mut best: Option<(f64, DVec2)> = None;

        // Vertical edges: solve p0.x + t*d.x == edge_x, keep the hit if
        // its y lands within the edge span. The returned point carries
        // the exact edge coordinate so the crossing always tests as
        // inside the (closed) margins.
        for edge_x in [self.min_x, self.max_x] {
            if d.x != 0.0 {
                let t = (edge_x - p0.x) / d.x;
                if (0.0..=1.0).contains(&t) {
                    let y = p0.y + t * d.y;
                    if y >= self.min_y
                        && y <= self.max_y
                        && best.is_none_or(|(b, _)| t < b)
                    {
                        best = Some((t, dvec2(edge_x, y)));
                    }
                }
            }
        }
        // Horizontal edges.
        for edge_y in [self.min_y, self.max_y] {
            if d.y != 0.0 {
                let t = (edge_y - p0.y) / d.y;
                if (0.0..=1.0).contains(&t) {
                    let x = p0.x + t * d.x;
                    if x >= self.min_x
                        && x <= self.max_x
                        && best.is_none_or(|(b, _)| t < b)
                    {
                        best = Some((t, dvec2(x, edge_y)));
                    }
                }
            }
        }

        best.map(|(_, p)| p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn margins() -> Margins {
        Margins::try_new(0.0, 0.0, 100.0, 100.0).unwrap()
    }

    #[test]
    fn try_new_rejects_inverted() {
        assert_eq!(
            Margins::try_new(10.0, 0.0, 10.0, 100.0),
            Err(NumericError::InvertedRect)
        );
        assert_eq!(
            Margins::try_new(0.0, 50.0, 100.0, 40.0),
            Err(NumericError::InvertedRect)
        );
    }

    #[test]
    fn try_new_rejects_nan_and_infinity() {
        assert_eq!(
            Margins::try_new(f64::NAN, 0.0, 100.0, 100.0),
            Err(NumericError::NaN)
        );
        assert_eq!(
            Margins::try_new(0.0, 0.0, f64::INFINITY, 100.0),
            Err(NumericError::Infinite)
        );
    }

    #[test]
    fn contains_is_closed_on_edges() {
        let m = margins();
        assert!(m.contains(dvec2(0.0, 50.0)));
        assert!(m.contains(dvec2(100.0, 50.0)));
        assert!(m.contains(dvec2(50.0, 0.0)));
        assert!(m.contains(dvec2(50.0, 100.0)));
        assert!(!m.contains(dvec2(-0.001, 50.0)));
        assert!(!m.contains(dvec2(50.0, 100.001)));
    }

    #[test]
    fn clip_entering_from_left() {
        let m = margins();
        let hit = m.clip(dvec2(-10.0, 50.0), dvec2(10.0, 50.0)).unwrap();
        assert_eq!(hit, dvec2(0.0, 50.0));
        assert!(m.contains(hit));
    }

    #[test]
    fn clip_leaving_through_top() {
        let m = margins();
        let hit = m.clip(dvec2(50.0, 90.0), dvec2(50.0, 110.0)).unwrap();
        assert_eq!(hit, dvec2(50.0, 100.0));
    }

    #[test]
    fn clip_diagonal_crossing() {
        let m = margins();
        let hit = m.clip(dvec2(-10.0, 40.0), dvec2(10.0, 60.0)).unwrap();
        assert!((hit.x - 0.0).abs() < 1e-12);
        assert!((hit.y - 50.0).abs() < 1e-12);
    }

    #[test]
    fn clip_prefers_crossing_nearest_start() {
        // Segment from outside the corner to deep inside cuts both the
        // left and bottom edge lines; the earlier crossing wins.
        let m = margins();
        let hit = m.clip(dvec2(-10.0, -5.0), dvec2(30.0, 35.0)).unwrap();
        assert!(m.contains(hit));
        // The y=0 line is cut first (t=0.125) but at x=-5, outside its
        // span; the first in-span hit is x=0 at t=0.25, y=5.
        assert!((hit.x - 0.0).abs() < 1e-12);
        assert!((hit.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn clip_miss_returns_none() {
        // Both endpoints on the same side, no edge span crossed.
        let m = margins();
        assert!(m.clip(dvec2(-10.0, -10.0), dvec2(-5.0, -5.0)).is_none());
    }
}
