//! Path extraction: one named layer in, ordered polylines out.

use crate::flatten::Flattener;
use crate::source::DrawingSource;
use cutkit_core::{Affine, ConfigurationError, Polyline, Subpath};
use tracing::{debug, warn};

/// Flattens every subpath of a layer into millimeter-space polylines
#[derive(Debug, Clone)]
pub struct PathExtractor {
    flattener: Flattener,
    /// Drawing units to millimeters, applied after path transforms
    scale: Affine,
}

impl PathExtractor {
    pub fn new(flattener: Flattener, scale: Affine) -> Self {
        Self { flattener, scale }
    }

    /// Extract polylines from `layer` in document order
    ///
    /// Indices are assigned in the order polylines are produced and serve as
    /// the sequencing tie-break.
    pub fn extract(
        &self,
        source: &dyn DrawingSource,
        layer: &str,
    ) -> Result<Vec<Polyline>, ConfigurationError> {
        let paths = source.layer_paths(layer)?;
        if paths.is_empty() {
            return Err(ConfigurationError::EmptySelection {
                layer: layer.to_string(),
            });
        }

        let mut polylines = Vec::new();
        for path in &paths {
            let transform = match path.transform {
                Some(t) => t.then(&self.scale),
                None => self.scale,
            };
            for subpath in &path.subpaths {
                let segments: Vec<_> = subpath
                    .segments
                    .iter()
                    .map(|s| s.transformed(&transform))
                    .collect();
                let points = self.flattener.flatten(&Subpath::new(segments));
                let polyline = Polyline::new(points, path.stroke.clone(), polylines.len());
                match polyline.validate() {
                    Ok(()) => polylines.push(polyline),
                    Err(e) => warn!(
                        "Skipping subpath of {}: {}",
                        path.id.as_deref().unwrap_or("unnamed path"),
                        e
                    ),
                }
            }
        }

        if polylines.is_empty() {
            return Err(ConfigurationError::NoPoints {
                layer: layer.to_string(),
            });
        }
        debug!(
            "Extracted {} polyline(s) from {} path(s) in layer '{}'",
            polylines.len(),
            paths.len(),
            layer
        );
        Ok(polylines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryDrawing;
    use cutkit_core::{pt, CurveSegment, SourcePath};

    fn extractor(steps: u32) -> PathExtractor {
        PathExtractor::new(Flattener::new(steps).unwrap(), Affine::identity())
    }

    #[test]
    fn test_subpaths_become_separate_polylines() {
        let path = SourcePath::new(
            vec![
                Subpath::new(vec![CurveSegment::line(pt(0.0, 0.0), pt(1.0, 0.0))]),
                Subpath::default(),
                Subpath::new(vec![CurveSegment::line(pt(5.0, 5.0), pt(6.0, 5.0))]),
            ],
            "red",
        );
        let drawing = MemoryDrawing::new().with_layer("Cut", vec![path]);
        let polylines = extractor(4).extract(&drawing, "Cut").unwrap();
        assert_eq!(polylines.len(), 2);
        assert_eq!(polylines[0].index, 0);
        assert_eq!(polylines[1].index, 1);
        assert_eq!(polylines[1].points[0], pt(5.0, 5.0));
        assert_eq!(polylines[1].color, "red");
    }

    #[test]
    fn test_transform_then_scale() {
        let path = SourcePath::new(
            vec![Subpath::new(vec![CurveSegment::line(pt(0.0, 0.0), pt(1.0, 0.0))])],
            "black",
        )
        .with_transform(Affine::translation(1.0, 1.0));
        let drawing = MemoryDrawing::new().with_layer("Cut", vec![path]);
        let extractor = PathExtractor::new(Flattener::new(1).unwrap(), Affine::scale(2.0, 3.0));
        let polylines = extractor.extract(&drawing, "Cut").unwrap();
        assert_eq!(polylines[0].points, vec![pt(2.0, 3.0), pt(4.0, 3.0)]);
    }

    #[test]
    fn test_empty_layer_errors() {
        let drawing = MemoryDrawing::new()
            .with_layer("Cut", Vec::new())
            .with_layer("Crease", vec![SourcePath::new(vec![Subpath::default()], "black")]);
        assert_eq!(
            extractor(4).extract(&drawing, "Cut"),
            Err(ConfigurationError::EmptySelection {
                layer: "Cut".to_string()
            })
        );
        assert_eq!(
            extractor(4).extract(&drawing, "Crease"),
            Err(ConfigurationError::NoPoints {
                layer: "Crease".to_string()
            })
        );
        assert!(matches!(
            extractor(4).extract(&drawing, "Mark"),
            Err(ConfigurationError::MissingLayer { .. })
        ));
    }
}
