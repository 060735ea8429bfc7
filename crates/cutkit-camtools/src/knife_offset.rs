//! Drag-knife offset compensation.
//!
//! A drag blade trails its holder by a fixed distance, so each target point
//! is pushed forward along the local direction of travel by that distance.

use cutkit_core::constants::COINCIDENT_EPSILON_MM;
use cutkit_core::{Point2D, Polyline, ToolId};

/// Shift every point `offset` mm along its forward tangent
///
/// The tangent at a point is the direction to the next point; the last point
/// reuses the direction from its predecessor. Points whose neighbour
/// coincides with them are not moved.
pub fn offset_points(points: &[Point2D], offset: f64) -> Vec<Point2D> {
    if offset == 0.0 || points.len() < 2 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let direction = if i < last {
                points[i + 1] - *p
            } else {
                *p - points[i - 1]
            };
            let len = direction.length();
            if len < COINCIDENT_EPSILON_MM {
                *p
            } else {
                *p + direction * (offset / len)
            }
        })
        .collect()
}

/// Compensate a polyline in place when it is assigned to the cut tool
pub fn apply_knife_offset(polyline: &mut Polyline, offset: f64) -> bool {
    let is_cut = polyline.tool.is_some_and(|t| t.tool == ToolId::Cut);
    if !is_cut || offset <= 0.0 {
        return false;
    }
    polyline.points = offset_points(&polyline.points, offset);
    true
}
