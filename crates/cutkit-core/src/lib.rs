//! # CutKit Core
//!
//! Core types and utilities for CutKit.
//! Provides the geometry model shared by every pipeline stage, device units
//! and media sizes, the calibration frame, the motion program and the error
//! taxonomy.

pub mod constants;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod program;
pub mod tool;
pub mod units;

pub use error::{ConfigurationError, DeliveryError, Error, GeometryError, Result};

pub use frame::{CalibrationFrame, RegistrationMode};

pub use geometry::{
    pt, Affine, CurveSegment, Point2D, Polyline, SourcePath, Subpath,
};

pub use program::{MotionCommand, MotionProgram};

pub use tool::{OvercutPolicy, ToolAssignment, ToolId};

pub use units::{AxisOrientation, DeviceProfile, MediaSize};
