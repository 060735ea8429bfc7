//! Unit conversion utilities
//!
//! Handles conversion between millimeters and plotter device units, the
//! per-device axis orientation, and the media sizes the cutter accepts.

use crate::constants::UNITS_PER_MM;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Convert millimeters to device units, rounding to the nearest unit
pub fn mm_to_units(value_mm: f64, units_per_mm: f64) -> i64 {
    (value_mm * units_per_mm).round() as i64
}

/// Convert millimeters to device units, truncating toward zero
///
/// Used for framing tokens, which the plotter expects floored.
pub fn mm_to_units_truncated(value_mm: f64, units_per_mm: f64) -> i64 {
    (value_mm * units_per_mm) as i64
}

/// How frame-local millimeters map onto the device axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrientation {
    /// device = (x - min_x, y - min_y)
    Identity,
    /// Axes swapped and both flipped: device = (max_y - y, max_x - x)
    SwapFlip,
}

/// Fixed properties of a target plotter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceProfile {
    pub name: &'static str,
    pub units_per_mm: f64,
    pub orientation: AxisOrientation,
}

impl DeviceProfile {
    /// SkyCut-family cutters: 40 units/mm, origin at the bottom-right corner
    pub const SKYCUT: Self = Self {
        name: "SkyCut D24",
        units_per_mm: UNITS_PER_MM,
        orientation: AxisOrientation::SwapFlip,
    };
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::SKYCUT
    }
}

/// Media (page) size selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaSize {
    /// A4 portrait
    #[default]
    A4p,
    /// A4 landscape
    A4l,
    /// A3 portrait
    A3p,
    /// A3 landscape
    A3l,
}

impl MediaSize {
    /// (width, height) in millimeters
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            Self::A4p => (210.0, 297.0),
            Self::A4l => (297.0, 210.0),
            Self::A3p => (297.0, 420.0),
            Self::A3l => (420.0, 297.0),
        }
    }
}

impl fmt::Display for MediaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A4p => write!(f, "a4p"),
            Self::A4l => write!(f, "a4l"),
            Self::A3p => write!(f, "a3p"),
            Self::A3l => write!(f, "a3l"),
        }
    }
}

impl FromStr for MediaSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a4p" | "a4" => Ok(Self::A4p),
            "a4l" => Ok(Self::A4l),
            "a3p" | "a3" => Ok(Self::A3p),
            "a3l" => Ok(Self::A3l),
            _ => Err(format!("Unknown media size: {}", s)),
        }
    }
}
