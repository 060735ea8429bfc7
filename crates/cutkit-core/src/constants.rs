//! Fixed numeric constants shared across the pipeline.

/// Plotter resolution: device units per millimeter
pub const UNITS_PER_MM: f64 = 40.0;

/// Default number of samples per cubic segment
pub const DEFAULT_STEPS_PER_SEGMENT: u32 = 16;

/// Two points closer than this (per axis, mm) close a polyline
pub const CLOSED_TOLERANCE_MM: f64 = 0.01;

/// Overcut walk ignores segments shorter than this (mm)
pub const MIN_STEP_MM: f64 = 0.001;

/// Tangent vectors shorter than this are treated as coincident points (mm)
pub const COINCIDENT_EPSILON_MM: f64 = 1e-9;

/// Longest overcut accepted (mm); the walk wraps around small outlines,
/// so the appended point count grows with length over perimeter
pub const MAX_OVERCUT_MM: f64 = 50.0;

/// Slack allowed when comparing the work area to the media size (mm)
pub const MEDIA_SLACK_MM: f64 = 0.1;

/// Default layer holding the paths to plot
pub const CUT_LAYER: &str = "Cut";

/// Default layer holding the calibration markers
pub const MARK_LAYER: &str = "Mark";
