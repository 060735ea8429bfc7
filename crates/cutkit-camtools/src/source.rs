//! Drawing sources
//!
//! The compiler reads drawings through [`DrawingSource`] so it never depends
//! on a particular document format. [`MemoryDrawing`] is the in-memory
//! implementation used by tests and by callers that build geometry in code;
//! the SVG reader lives in [`crate::svg`].

use cutkit_core::{ConfigurationError, Point2D, SourcePath};

/// Read-only view of a layered drawing
pub trait DrawingSource {
    /// Every path under the layer whose label matches `layer` exactly,
    /// ignoring case and surrounding whitespace, in document order.
    ///
    /// Returns [`ConfigurationError::MissingLayer`] when no such layer exists.
    fn layer_paths(&self, layer: &str) -> Result<Vec<SourcePath>, ConfigurationError>;

    /// One reference point per registration marker in the first layer whose
    /// label contains `layer` (case-insensitive), transforms applied.
    /// Decorative markers are excluded.
    fn marker_points(&self, layer: &str) -> Result<Vec<Point2D>, ConfigurationError>;

    /// Declared (width, height) of the drawing coordinate system
    fn viewbox_size(&self) -> Option<(f64, f64)>;
}

#[derive(Debug, Clone)]
struct MemoryLayer {
    label: String,
    paths: Vec<SourcePath>,
    markers: Vec<Point2D>,
}

/// Drawing assembled in code
#[derive(Debug, Clone, Default)]
pub struct MemoryDrawing {
    layers: Vec<MemoryLayer>,
    viewbox: Option<(f64, f64)>,
}

impl MemoryDrawing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer of paths
    pub fn with_layer(mut self, label: impl Into<String>, paths: Vec<SourcePath>) -> Self {
        self.layers.push(MemoryLayer {
            label: label.into(),
            paths,
            markers: Vec::new(),
        });
        self
    }

    /// Add a layer holding registration marker reference points
    pub fn with_markers(mut self, label: impl Into<String>, markers: Vec<Point2D>) -> Self {
        self.layers.push(MemoryLayer {
            label: label.into(),
            paths: Vec::new(),
            markers,
        });
        self
    }

    pub fn with_viewbox(mut self, width: f64, height: f64) -> Self {
        self.viewbox = Some((width, height));
        self
    }
}

impl DrawingSource for MemoryDrawing {
    fn layer_paths(&self, layer: &str) -> Result<Vec<SourcePath>, ConfigurationError> {
        self.layers
            .iter()
            .find(|l| labels_match(&l.label, layer))
            .map(|l| l.paths.clone())
            .ok_or_else(|| ConfigurationError::MissingLayer {
                layer: layer.to_string(),
            })
    }

    fn marker_points(&self, layer: &str) -> Result<Vec<Point2D>, ConfigurationError> {
        self.layers
            .iter()
            .find(|l| label_contains(&l.label, layer))
            .map(|l| l.markers.clone())
            .ok_or_else(|| ConfigurationError::MissingLayer {
                layer: layer.to_string(),
            })
    }

    fn viewbox_size(&self) -> Option<(f64, f64)> {
        self.viewbox
    }
}

/// Exact label match, case-insensitive, whitespace-trimmed
pub fn labels_match(label: &str, wanted: &str) -> bool {
    label.trim().eq_ignore_ascii_case(wanted.trim())
}

/// Substring label match, case-insensitive
pub fn label_contains(label: &str, wanted: &str) -> bool {
    label
        .to_lowercase()
        .contains(&wanted.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutkit_core::pt;

    #[test]
    fn test_label_matching() {
        assert!(labels_match("  CUT ", "Cut"));
        assert!(!labels_match("Cutting", "Cut"));
        assert!(label_contains("Registration Marks", "Mark"));
        assert!(!label_contains("Cut", "Mark"));
    }

    #[test]
    fn test_memory_drawing_lookup() {
        let drawing = MemoryDrawing::new()
            .with_layer(
                "cut",
                vec![SourcePath::polygon(&[pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)], "red")],
            )
            .with_markers("marks", vec![pt(0.0, 0.0)]);

        assert_eq!(drawing.layer_paths("Cut").unwrap().len(), 1);
        assert_eq!(drawing.marker_points("Mark").unwrap().len(), 1);
        assert_eq!(
            drawing.layer_paths("Crease"),
            Err(ConfigurationError::MissingLayer {
                layer: "Crease".to_string()
            })
        );
        assert!(drawing.viewbox_size().is_none());
    }
}
