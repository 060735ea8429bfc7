//! Path-to-motion compiler
//!
//! Runs the full pipeline once over a drawing:
//! extract → register → classify → sequence → overcut → knife offset → emit.
//! Every failure is a [`ConfigurationError`] raised before any program text
//! exists, so a caller never sees a partial program.

use crate::classify::{classify, sequence};
use crate::emitter::MotionEmitter;
use crate::extract::PathExtractor;
use crate::flatten::Flattener;
use crate::knife_offset::apply_knife_offset;
use crate::overcut::apply_overcut;
use crate::registrar::Registrar;
use crate::source::DrawingSource;
use cutkit_core::constants::{CUT_LAYER, DEFAULT_STEPS_PER_SEGMENT, MARK_LAYER, MAX_OVERCUT_MM};
use cutkit_core::{
    CalibrationFrame, ConfigurationError, DeviceProfile, MediaSize, MotionProgram, OvercutPolicy,
    Polyline, RegistrationMode,
};
use tracing::{debug, info};

/// Default knife offset (mm)
pub const DEFAULT_KNIFE_OFFSET_MM: f64 = 0.30;
/// Default overcut length (mm)
pub const DEFAULT_OVERCUT_MM: f64 = 0.30;

/// Parameters for one compile
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub mode: RegistrationMode,
    pub cut_layer: String,
    pub mark_layer: String,
    pub steps_per_segment: u32,
    pub knife_offset_mm: f64,
    pub overcut_mm: f64,
    pub overcut_policy: OvercutPolicy,
    pub media: MediaSize,
    pub profile: DeviceProfile,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            mode: RegistrationMode::Marker,
            cut_layer: CUT_LAYER.to_string(),
            mark_layer: MARK_LAYER.to_string(),
            steps_per_segment: DEFAULT_STEPS_PER_SEGMENT,
            knife_offset_mm: DEFAULT_KNIFE_OFFSET_MM,
            overcut_mm: DEFAULT_OVERCUT_MM,
            overcut_policy: OvercutPolicy::default(),
            media: MediaSize::default(),
            profile: DeviceProfile::default(),
        }
    }
}

impl CompileOptions {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.steps_per_segment == 0 {
            return Err(ConfigurationError::invalid(
                "steps_per_segment",
                "must be at least 1",
            ));
        }
        if !self.knife_offset_mm.is_finite() || self.knife_offset_mm < 0.0 {
            return Err(ConfigurationError::invalid(
                "knife_offset_mm",
                format!("must be a finite value >= 0, got {}", self.knife_offset_mm),
            ));
        }
        if !self.overcut_mm.is_finite() || self.overcut_mm < 0.0 {
            return Err(ConfigurationError::invalid(
                "overcut_mm",
                format!("must be a finite value >= 0, got {}", self.overcut_mm),
            ));
        }
        if self.overcut_mm > MAX_OVERCUT_MM {
            return Err(ConfigurationError::invalid(
                "overcut_mm",
                format!("must be at most {} mm, got {}", MAX_OVERCUT_MM, self.overcut_mm),
            ));
        }
        if self.cut_layer.trim().is_empty() {
            return Err(ConfigurationError::invalid("cut_layer", "must not be empty"));
        }
        if self.mode == RegistrationMode::Marker && self.mark_layer.trim().is_empty() {
            return Err(ConfigurationError::invalid("mark_layer", "must not be empty"));
        }
        if !self.profile.units_per_mm.is_finite() || self.profile.units_per_mm <= 0.0 {
            return Err(ConfigurationError::invalid(
                "units_per_mm",
                "device resolution must be positive",
            ));
        }
        Ok(())
    }
}

/// Result of a successful compile
#[derive(Debug, Clone)]
pub struct Compilation {
    pub program: MotionProgram,
    pub frame: CalibrationFrame,
    /// Final polylines in emission order, overcut and offset applied
    pub polylines: Vec<Polyline>,
}

/// Compiles drawings into motion programs
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Result<Self, ConfigurationError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile and keep the intermediate frame and polylines
    pub fn compile_detailed(
        &self,
        source: &dyn DrawingSource,
    ) -> Result<Compilation, ConfigurationError> {
        let opts = &self.options;
        let registrar = Registrar::new(opts.mode, opts.media, opts.mark_layer.clone());
        let extractor = PathExtractor::new(
            Flattener::new(opts.steps_per_segment)?,
            registrar.drawing_scale(source),
        );

        let mut polylines = extractor.extract(source, &opts.cut_layer)?;
        let frame = registrar.register(source, &polylines)?;

        classify(&mut polylines, opts.overcut_policy);
        let mut polylines = sequence(polylines);

        let mut overcut_points = 0;
        let mut offset_count = 0;
        for polyline in polylines.iter_mut() {
            overcut_points += apply_overcut(polyline, opts.overcut_mm);
            if apply_knife_offset(polyline, opts.knife_offset_mm) {
                offset_count += 1;
            }
        }
        debug!(
            "Overcut added {} point(s); knife offset applied to {} polyline(s)",
            overcut_points, offset_count
        );

        let program = MotionEmitter::new(frame, opts.profile, opts.media).emit(&polylines);
        info!(
            "Compiled {} polyline(s) into {} motion command(s) ({} registration)",
            polylines.len(),
            program.motion_count(),
            opts.mode
        );

        Ok(Compilation {
            program,
            frame,
            polylines,
        })
    }

    /// Compile a drawing into a motion program
    pub fn compile(&self, source: &dyn DrawingSource) -> Result<MotionProgram, ConfigurationError> {
        self.compile_detailed(source).map(|c| c.program)
    }
}
