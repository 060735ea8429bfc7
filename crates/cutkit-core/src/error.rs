//! Error handling for CutKit
//!
//! Provides error types for every stage of a plot run:
//! - Configuration errors (missing layers, marker counts, bad parameters)
//! - Geometry errors (degenerate frames, non-finite coordinates)
//! - Delivery errors (file and network sinks)
//!
//! Compilation only ever fails with configuration or geometry errors.
//! Delivery errors are reported separately so a caller can tell a program
//! that never compiled from one that compiled but could not be sent.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised when a geometric precondition fails. Recoverable cases (a single
/// zero-length subpath) are skipped by the stage that finds them; the rest
/// escalate into [`ConfigurationError::Degenerate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Calibration frame has zero (or negative) width or height
    #[error("Degenerate calibration frame: {width:.3} x {height:.3} mm")]
    DegenerateFrame {
        /// Frame width in millimeters.
        width: f64,
        /// Frame height in millimeters.
        height: f64,
    },

    /// A coordinate was NaN or infinite
    #[error("Non-finite coordinate in {context}")]
    NonFinite {
        /// Where the coordinate was found.
        context: String,
    },

    /// A polyline ended up with fewer than two points
    #[error("Polyline {index} has {count} point(s), at least 2 required")]
    TooFewPoints {
        /// Extraction index of the polyline.
        index: usize,
        /// Number of points it had.
        count: usize,
    },
}

/// Configuration error type
///
/// Always reported to the operator; the run aborts without emitting any
/// partial program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Named layer is not present in the drawing
    #[error("No layer named '{layer}' found")]
    MissingLayer {
        /// The layer that was looked up.
        layer: String,
    },

    /// Marker layer does not hold exactly four markers
    #[error("Expected 4 markers in layer '{layer}', found {found}")]
    MarkerCount {
        /// The marker layer.
        layer: String,
        /// Number of markers detected.
        found: usize,
    },

    /// Layer exists but holds no paths
    #[error("No paths in layer '{layer}'")]
    EmptySelection {
        /// The layer that was empty.
        layer: String,
    },

    /// Paths were found but none produced usable points
    #[error("No points extracted from layer '{layer}'")]
    NoPoints {
        /// The layer that produced no points.
        layer: String,
    },

    /// Output path for file delivery is empty
    #[error("Output path is empty")]
    EmptyOutputPath,

    /// A configuration parameter is out of range
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The drawing could not be parsed
    #[error("Failed to parse drawing: {reason}")]
    DocumentParse {
        /// Parser message.
        reason: String,
    },

    /// A geometric precondition failed in a way that cannot be skipped
    #[error(transparent)]
    Degenerate(#[from] GeometryError),
}

impl ConfigurationError {
    /// Shorthand for [`ConfigurationError::InvalidParameter`]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Delivery error type
///
/// Represents failures handing a finished program to a byte sink.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    /// Could not establish the connection
    #[error("Failed to connect to {address}: {reason}")]
    Connect {
        /// Target address.
        address: String,
        /// The reason the connection failed.
        reason: String,
    },

    /// Connection or write timed out
    #[error("Timed out after {timeout_ms}ms talking to {address}")]
    Timeout {
        /// Target address.
        address: String,
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Address could not be parsed or resolved
    #[error("Invalid address: {address}")]
    InvalidAddress {
        /// The rejected address.
        address: String,
    },

    /// Writing to the sink failed
    #[error("Failed to write to {target}: {reason}")]
    Write {
        /// File path or network address.
        target: String,
        /// The reason the write failed.
        reason: String,
    },
}

/// Main error type for CutKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Delivery error
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            Error::Geometry(_) | Error::Configuration(ConfigurationError::Degenerate(_))
        )
    }

    /// Check if this is a delivery error
    pub fn is_delivery_error(&self) -> bool {
        matches!(self, Error::Delivery(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
