//! # CutKit CAM Tools
//!
//! The path-to-motion compiler. A drawing flows through these stages once
//! per invocation:
//!
//! - **Drawing source**: SVG or in-memory layers ([`SvgDrawing`], [`MemoryDrawing`])
//! - **Flattener**: cubic segments to sampled polylines
//! - **Extractor**: one named layer to ordered, millimeter-space polylines
//! - **Registrar**: calibration frame from corner markers or the bounding box
//! - **Classifier**: stroke color to tool, priority and overcut eligibility
//! - **Overcut** and **knife offset**: blade-specific point adjustments
//! - **Emitter**: device units, deduplication, framing and tool changes
//!
//! [`Compiler`] wires the stages together.

pub mod classify;
pub mod compiler;
pub mod emitter;
pub mod extract;
pub mod flatten;
pub mod knife_offset;
pub mod overcut;
pub mod registrar;
pub mod source;
pub mod svg;

pub use classify::{assign_tool, classify, color_family, normalize_color, sequence, ColorFamily};
pub use compiler::{CompileOptions, Compilation, Compiler};
pub use emitter::{EmitterState, MotionEmitter};
pub use extract::PathExtractor;
pub use flatten::Flattener;
pub use knife_offset::{apply_knife_offset, offset_points};
pub use overcut::{apply_overcut, overcut_points};
pub use registrar::Registrar;
pub use source::{DrawingSource, MemoryDrawing};
pub use svg::SvgDrawing;
