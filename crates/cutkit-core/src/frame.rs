//! Calibration frame: the physical work area a run is registered against.

use crate::error::GeometryError;
use crate::geometry::Point2D;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the calibration frame is established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationMode {
    /// Four corner markers on the mark layer, scaled to the media
    #[default]
    Marker,
    /// Bounding box of the cut paths, drawing units taken as millimeters
    BoundingBox,
}

impl fmt::Display for RegistrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marker => write!(f, "marker"),
            Self::BoundingBox => write!(f, "bounding_box"),
        }
    }
}

impl FromStr for RegistrationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "marker" | "markers" => Ok(Self::Marker),
            "bounding_box" | "bbox" => Ok(Self::BoundingBox),
            _ => Err(format!("Unknown registration mode: {}", s)),
        }
    }
}

/// Axis-aligned work area in device millimeters
///
/// Built once per run and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationFrame {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    mode: RegistrationMode,
}

impl CalibrationFrame {
    /// Validates finiteness and a strictly positive extent on both axes
    pub fn new(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        mode: RegistrationMode,
    ) -> Result<Self, GeometryError> {
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFinite {
                context: "calibration frame".to_string(),
            });
        }
        if max_x <= min_x || max_y <= min_y {
            return Err(GeometryError::DegenerateFrame {
                width: max_x - min_x,
                height: max_y - min_y,
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
            mode,
        })
    }

    /// Bounding rectangle of `points`
    pub fn from_points<I>(points: I, mode: RegistrationMode) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = Point2D>,
    {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::new(min_x, min_y, max_x, max_y, mode)
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn mode(&self) -> RegistrationMode {
        self.mode
    }
}
