//! Overcut: retrace the start of a closed cut so the blade finishes the seam.

use cutkit_core::constants::MIN_STEP_MM;
use cutkit_core::{Point2D, Polyline};

/// Points that retrace `points` from its first point for `length` mm
///
/// Steps shorter than [`MIN_STEP_MM`] are skipped. The final point is
/// interpolated so the retraced length is exactly `length`; an outline
/// shorter than `length` is walked again from the start.
pub fn overcut_points(points: &[Point2D], length: f64) -> Vec<Point2D> {
    let mut added = Vec::new();
    if !length.is_finite() || length <= 0.0 || points.len() < 2 {
        return added;
    }
    let perimeter: f64 = points
        .windows(2)
        .map(|w| (w[1] - w[0]).length())
        .filter(|step| *step >= MIN_STEP_MM)
        .sum();
    if perimeter <= 0.0 {
        return added;
    }

    let mut remaining = length;
    for w in points.windows(2).cycle() {
        let (from, to) = (w[0], w[1]);
        let step = (to - from).length();
        if step < MIN_STEP_MM {
            continue;
        }
        if step >= remaining {
            added.push(from.lerp(to, remaining / step));
            break;
        }
        added.push(to);
        remaining -= step;
    }
    added
}

/// Extend a classified, closed polyline in place
///
/// Returns the number of points added; open polylines and tools without
/// overcut are left alone.
pub fn apply_overcut(polyline: &mut Polyline, length: f64) -> usize {
    let eligible = polyline.tool.is_some_and(|t| t.has_overcut);
    if !eligible || !polyline.is_closed() {
        return 0;
    }
    let added = overcut_points(&polyline.points, length);
    let count = added.len();
    polyline.points.extend(added);
    count
}
