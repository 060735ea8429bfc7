//! Coordinate registration
//!
//! Establishes the calibration frame for a run, either from four corner
//! markers or from the bounding box of the extracted cut paths. The two
//! modes never mix: marker mode ignores the cut geometry and bounding-box
//! mode never reads the mark layer.

use crate::source::DrawingSource;
use cutkit_core::constants::MEDIA_SLACK_MM;
use cutkit_core::{
    Affine, CalibrationFrame, ConfigurationError, MediaSize, Polyline, RegistrationMode,
};
use tracing::{debug, warn};

/// Number of registration markers a marker-mode drawing must carry
pub const MARKER_COUNT: usize = 4;

/// Builds the calibration frame for one run
#[derive(Debug, Clone)]
pub struct Registrar {
    mode: RegistrationMode,
    media: MediaSize,
    mark_layer: String,
}

impl Registrar {
    pub fn new(mode: RegistrationMode, media: MediaSize, mark_layer: impl Into<String>) -> Self {
        Self {
            mode,
            media,
            mark_layer: mark_layer.into(),
        }
    }

    pub fn mode(&self) -> RegistrationMode {
        self.mode
    }

    /// Drawing units to millimeters
    ///
    /// Marker mode maps the viewBox onto the selected media; without a
    /// viewBox, or in bounding-box mode, drawing units are millimeters.
    pub fn drawing_scale(&self, source: &dyn DrawingSource) -> Affine {
        match (self.mode, source.viewbox_size()) {
            (RegistrationMode::Marker, Some((vb_w, vb_h))) => {
                let (page_w, page_h) = self.media.dimensions_mm();
                Affine::scale(page_w / vb_w, page_h / vb_h)
            }
            _ => Affine::identity(),
        }
    }

    /// Compute the frame
    ///
    /// `polylines` are the extracted cut paths, already in millimeters; they
    /// are only consulted in bounding-box mode.
    pub fn register(
        &self,
        source: &dyn DrawingSource,
        polylines: &[Polyline],
    ) -> Result<CalibrationFrame, ConfigurationError> {
        let frame = match self.mode {
            RegistrationMode::Marker => self.register_markers(source)?,
            RegistrationMode::BoundingBox => CalibrationFrame::from_points(
                polylines.iter().flat_map(|p| p.points.iter().copied()),
                RegistrationMode::BoundingBox,
            )?,
        };
        debug!(
            "Calibration frame ({}): x {:.3}..{:.3}, y {:.3}..{:.3} mm",
            frame.mode(),
            frame.min_x(),
            frame.max_x(),
            frame.min_y(),
            frame.max_y()
        );
        Ok(frame)
    }

    fn register_markers(
        &self,
        source: &dyn DrawingSource,
    ) -> Result<CalibrationFrame, ConfigurationError> {
        let markers = source.marker_points(&self.mark_layer)?;
        if markers.len() != MARKER_COUNT {
            return Err(ConfigurationError::MarkerCount {
                layer: self.mark_layer.clone(),
                found: markers.len(),
            });
        }

        let scale = self.drawing_scale(source);
        let frame = CalibrationFrame::from_points(
            markers.into_iter().map(|p| scale.transform_point(p)),
            RegistrationMode::Marker,
        )?;

        let (page_w, page_h) = self.media.dimensions_mm();
        if frame.width() > page_w + MEDIA_SLACK_MM || frame.height() > page_h + MEDIA_SLACK_MM {
            warn!(
                "Work area {:.1}x{:.1} mm exceeds media {} ({}x{} mm)",
                frame.width(),
                frame.height(),
                self.media,
                page_w,
                page_h
            );
        }
        Ok(frame)
    }
}
