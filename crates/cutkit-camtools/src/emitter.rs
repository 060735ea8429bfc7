//! Motion emission
//!
//! Maps frame millimeters to integer device units and writes the motion
//! program: a framing preamble, one pen-up travel plus pen-down moves per
//! polyline, tool changes where the tool differs from the previous polyline,
//! and the fixed footer.

use cutkit_core::units::{mm_to_units, mm_to_units_truncated};
use cutkit_core::{
    AxisOrientation, CalibrationFrame, DeviceProfile, MediaSize, MotionCommand, MotionProgram,
    Point2D, Polyline, RegistrationMode, ToolId,
};
use tracing::{debug, warn};

/// Tool state carried from one polyline to the next
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitterState {
    pub current_tool: Option<ToolId>,
}

/// Writes device commands relative to a calibration frame
#[derive(Debug, Clone)]
pub struct MotionEmitter {
    frame: CalibrationFrame,
    profile: DeviceProfile,
    media: MediaSize,
}

impl MotionEmitter {
    pub fn new(frame: CalibrationFrame, profile: DeviceProfile, media: MediaSize) -> Self {
        Self {
            frame,
            profile,
            media,
        }
    }

    /// Device coordinates of a frame point
    pub fn to_device(&self, p: Point2D) -> (i64, i64) {
        let s = self.profile.units_per_mm;
        match self.profile.orientation {
            AxisOrientation::SwapFlip => (
                mm_to_units(self.frame.max_y() - p.y, s),
                mm_to_units(self.frame.max_x() - p.x, s),
            ),
            AxisOrientation::Identity => (
                mm_to_units(p.x - self.frame.min_x(), s),
                mm_to_units(p.y - self.frame.min_y(), s),
            ),
        }
    }

    /// Framing tokens for the frame's registration mode
    pub fn preamble(&self) -> Vec<String> {
        let mut header = vec!["IN".to_string()];
        if self.frame.mode() == RegistrationMode::Marker {
            let s = self.profile.units_per_mm;
            let work_w = mm_to_units_truncated(self.frame.width(), s);
            let work_h = mm_to_units_truncated(self.frame.height(), s);
            let (page_w_mm, page_h_mm) = self.media.dimensions_mm();
            let page_w = mm_to_units_truncated(page_w_mm, s);
            let page_h = mm_to_units_truncated(page_h_mm, s);
            let margin_left = mm_to_units_truncated(self.frame.min_x(), s);
            let margin_bottom = mm_to_units_truncated(self.frame.min_y(), s);

            header.push(format!("FSIZE{},{}", work_h, work_w));
            header.push(format!(
                "CMD:32,{},{},{},{};",
                page_h, page_w, margin_left, margin_bottom
            ));
            header.push("CMD:18,1;".to_string());
            header.push("CMD:35,1,2,0;".to_string());
            header.push(format!("TB26,{},{}", work_h, work_w));
        } else {
            header.push("CMD:18,1;".to_string());
            header.push("CMD:35,1,2,0;".to_string());
        }
        header
    }

    /// Emit one polyline
    ///
    /// Consecutive points landing on the same device coordinate collapse to
    /// one command. Unclassified polylines go to the cut tool.
    pub fn emit_polyline(
        &self,
        state: &mut EmitterState,
        program: &mut MotionProgram,
        polyline: &Polyline,
    ) {
        let tool = polyline.tool.map_or(ToolId::Cut, |t| t.tool);
        if state.current_tool != Some(tool) {
            program.push(MotionCommand::SelectTool(tool));
            state.current_tool = Some(tool);
        }

        let mut last: Option<(i64, i64)> = None;
        let mut emitted = 0usize;
        for p in &polyline.points {
            let (x, y) = self.to_device(*p);
            if last == Some((x, y)) {
                continue;
            }
            let command = if last.is_none() {
                MotionCommand::PenUp { x, y }
            } else {
                MotionCommand::PenDown { x, y }
            };
            program.push(command);
            last = Some((x, y));
            emitted += 1;
        }
        if emitted == 1 {
            warn!(
                "Polyline {} collapses to a single device point; travel move only",
                polyline.index
            );
        }
    }

    /// Emit a complete program for already sequenced polylines
    pub fn emit(&self, polylines: &[Polyline]) -> MotionProgram {
        let mut program = MotionProgram::with_header(self.preamble());
        let mut state = EmitterState::default();
        for polyline in polylines {
            self.emit_polyline(&mut state, &mut program, polyline);
        }
        program.finish();
        debug!(
            "Emitted {} motion(s), {} tool change(s)",
            program.motion_count(),
            program.tool_sequence().len()
        );
        program
    }
}
