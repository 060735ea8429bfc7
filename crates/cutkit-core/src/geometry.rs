//! Geometry primitives
//!
//! Drawing-space paths as they come out of a drawing source, and the
//! flattened polylines the compiler works on. Points and transforms are
//! `lyon` types so affine math and vector ops come for free.

use crate::constants::CLOSED_TOLERANCE_MM;
use crate::error::GeometryError;
use crate::tool::ToolAssignment;
use lyon::geom::{CubicBezierSegment, Transform};

/// 2D point in drawing units or millimeters, depending on the stage
pub type Point2D = lyon::geom::Point<f64>;

/// 2D affine transform
pub type Affine = Transform<f64>;

/// Shorthand constructor for [`Point2D`]
pub fn pt(x: f64, y: f64) -> Point2D {
    lyon::geom::point(x, y)
}

/// One cubic bezier arc: start, two control points, end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub start: Point2D,
    pub ctrl1: Point2D,
    pub ctrl2: Point2D,
    pub end: Point2D,
}

impl CurveSegment {
    /// Creates a new curve segment.
    pub fn new(start: Point2D, ctrl1: Point2D, ctrl2: Point2D, end: Point2D) -> Self {
        Self {
            start,
            ctrl1,
            ctrl2,
            end,
        }
    }

    /// Straight line expressed as a cubic with control points on the chord
    pub fn line(start: Point2D, end: Point2D) -> Self {
        Self::new(start, start.lerp(end, 1.0 / 3.0), start.lerp(end, 2.0 / 3.0), end)
    }

    /// Degree-elevated quadratic bezier
    pub fn quadratic(start: Point2D, ctrl: Point2D, end: Point2D) -> Self {
        Self::new(
            start,
            start.lerp(ctrl, 2.0 / 3.0),
            end.lerp(ctrl, 2.0 / 3.0),
            end,
        )
    }

    /// Applies an affine transform to all four points
    pub fn transformed(&self, transform: &Affine) -> Self {
        Self::new(
            transform.transform_point(self.start),
            transform.transform_point(self.ctrl1),
            transform.transform_point(self.ctrl2),
            transform.transform_point(self.end),
        )
    }

    /// `lyon` view of this segment
    pub fn to_lyon(&self) -> CubicBezierSegment<f64> {
        CubicBezierSegment {
            from: self.start,
            ctrl1: self.ctrl1,
            ctrl2: self.ctrl2,
            to: self.end,
        }
    }
}

/// Consecutive segments sharing endpoints; a new subpath starts at every move
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subpath {
    pub segments: Vec<CurveSegment>,
}

impl Subpath {
    pub fn new(segments: Vec<CurveSegment>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Final point of the last segment
    pub fn end_point(&self) -> Option<Point2D> {
        self.segments.last().map(|s| s.end)
    }
}

/// Path entity read from a drawing source
///
/// Geometry is in drawing units, untransformed; `transform` maps it into the
/// shared drawing frame. The compiler never mutates these.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePath {
    /// Element id, for diagnostics
    pub id: Option<String>,
    pub subpaths: Vec<Subpath>,
    /// Raw stroke color string as found in the document
    pub stroke: String,
    pub transform: Option<Affine>,
}

impl SourcePath {
    pub fn new(subpaths: Vec<Subpath>, stroke: impl Into<String>) -> Self {
        Self {
            id: None,
            subpaths,
            stroke: stroke.into(),
            transform: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Closed polygon through `points`, built from straight segments
    pub fn polygon(points: &[Point2D], stroke: impl Into<String>) -> Self {
        let mut segments: Vec<CurveSegment> = points
            .windows(2)
            .map(|w| CurveSegment::line(w[0], w[1]))
            .collect();
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if first != last {
                segments.push(CurveSegment::line(*last, *first));
            }
        }
        Self::new(vec![Subpath::new(segments)], stroke)
    }
}

/// Flattened form of one subpath
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point2D>,
    /// Color inherited from the source path
    pub color: String,
    /// Position in document traversal order
    pub index: usize,
    pub tool: Option<ToolAssignment>,
}

impl Polyline {
    pub fn new(points: Vec<Point2D>, color: impl Into<String>, index: usize) -> Self {
        Self {
            points,
            color: color.into(),
            index,
            tool: None,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last point coincide within [`CLOSED_TOLERANCE_MM`] per axis
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 2 => {
                (first.x - last.x).abs() < CLOSED_TOLERANCE_MM
                    && (first.y - last.y).abs() < CLOSED_TOLERANCE_MM
            }
            _ => false,
        }
    }

    /// Checks the "at least two points" invariant
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.points.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                index: self.index,
                count: self.points.len(),
            });
        }
        if self.points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GeometryError::NonFinite {
                context: format!("polyline {}", self.index),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_segment_control_points_on_chord() {
        let seg = CurveSegment::line(pt(0.0, 0.0), pt(3.0, 6.0));
        assert!((seg.ctrl1 - pt(1.0, 2.0)).length() < 1e-12);
        assert!((seg.ctrl2 - pt(2.0, 4.0)).length() < 1e-12);
    }

    #[test]
    fn test_quadratic_elevation() {
        let seg = CurveSegment::quadratic(pt(0.0, 0.0), pt(3.0, 3.0), pt(6.0, 0.0));
        assert_eq!(seg.start, pt(0.0, 0.0));
        assert_eq!(seg.end, pt(6.0, 0.0));
        assert!((seg.ctrl1.x - 2.0).abs() < 1e-12 && (seg.ctrl1.y - 2.0).abs() < 1e-12);
        assert!((seg.ctrl2.x - 4.0).abs() < 1e-12 && (seg.ctrl2.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_polyline_closed_detection() {
        let closed = Polyline::new(
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.005, 0.0)],
            "#000",
            0,
        );
        assert!(closed.is_closed());

        let open = Polyline::new(vec![pt(0.0, 0.0), pt(10.0, 0.0)], "#000", 1);
        assert!(!open.is_closed());

        let single = Polyline::new(vec![pt(0.0, 0.0)], "#000", 2);
        assert!(!single.is_closed());
    }

    #[test]
    fn test_polyline_validate() {
        let p = Polyline::new(vec![pt(1.0, 1.0)], "red", 7);
        assert_eq!(
            p.validate(),
            Err(GeometryError::TooFewPoints { index: 7, count: 1 })
        );

        let p = Polyline::new(vec![pt(1.0, 1.0), pt(f64::NAN, 0.0)], "red", 8);
        assert!(matches!(p.validate(), Err(GeometryError::NonFinite { .. })));
    }

    #[test]
    fn test_polygon_closes_itself() {
        let path = SourcePath::polygon(&[pt(0.0, 0.0), pt(5.0, 0.0), pt(5.0, 5.0)], "black");
        let segs = &path.subpaths[0].segments;
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[2].end, pt(0.0, 0.0));
    }
}
