//! Curve flattening
//!
//! Converts cubic bezier subpaths into polylines by uniform parameter
//! sampling. Every segment contributes `steps` samples taken at
//! `t = 0, 1/S, .., (S-1)/S`; the subpath end point is appended once at the
//! end, so a subpath of `n` segments always yields `n * S + 1` points.

use cutkit_core::{ConfigurationError, CurveSegment, Point2D, Subpath};

/// Uniform-step bezier flattener
#[derive(Debug, Clone, Copy)]
pub struct Flattener {
    steps: u32,
}

impl Flattener {
    /// Create a flattener taking `steps` samples per segment
    pub fn new(steps: u32) -> Result<Self, ConfigurationError> {
        if steps == 0 {
            return Err(ConfigurationError::invalid(
                "steps_per_segment",
                "must be at least 1",
            ));
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Samples of one segment, end point excluded
    pub fn sample_segment(&self, segment: &CurveSegment) -> Vec<Point2D> {
        let curve = segment.to_lyon();
        let step = 1.0 / self.steps as f64;
        (0..self.steps)
            .map(|k| curve.sample(k as f64 * step))
            .collect()
    }

    /// Flatten a whole subpath; empty subpaths give no points
    pub fn flatten(&self, subpath: &Subpath) -> Vec<Point2D> {
        let mut points = Vec::with_capacity(subpath.segments.len() * self.steps as usize + 1);
        for segment in &subpath.segments {
            points.extend(self.sample_segment(segment));
        }
        if let Some(end) = subpath.end_point() {
            points.push(end);
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutkit_core::pt;

    #[test]
    fn test_zero_steps_rejected() {
        assert!(matches!(
            Flattener::new(0),
            Err(ConfigurationError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_point_count() {
        let flattener = Flattener::new(16).unwrap();
        let subpath = Subpath::new(vec![
            CurveSegment::line(pt(0.0, 0.0), pt(10.0, 0.0)),
            CurveSegment::line(pt(10.0, 0.0), pt(10.0, 10.0)),
            CurveSegment::line(pt(10.0, 10.0), pt(0.0, 0.0)),
        ]);
        let points = flattener.flatten(&subpath);
        assert_eq!(points.len(), 3 * 16 + 1);
        assert_eq!(points[0], pt(0.0, 0.0));
        assert_eq!(points[16], pt(10.0, 0.0));
        assert_eq!(*points.last().unwrap(), pt(0.0, 0.0));
    }

    #[test]
    fn test_line_samples_are_evenly_spaced() {
        let flattener = Flattener::new(4).unwrap();
        let samples = flattener.sample_segment(&CurveSegment::line(pt(0.0, 0.0), pt(8.0, 0.0)));
        let xs: Vec<f64> = samples.iter().map(|p| p.x).collect();
        for (got, want) in xs.iter().zip([0.0, 2.0, 4.0, 6.0]) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn test_curve_samples_match_bernstein_form() {
        let seg = CurveSegment::new(pt(0.0, 0.0), pt(0.0, 10.0), pt(10.0, 10.0), pt(10.0, 0.0));
        let flattener = Flattener::new(2).unwrap();
        let samples = flattener.sample_segment(&seg);
        // t = 0.5: 0.125*P0 + 0.375*P1 + 0.375*P2 + 0.125*P3
        assert!((samples[1].x - 5.0).abs() < 1e-9);
        assert!((samples[1].y - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_subpath() {
        let flattener = Flattener::new(8).unwrap();
        assert!(flattener.flatten(&Subpath::default()).is_empty());
    }
}
