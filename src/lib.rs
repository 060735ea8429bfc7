//! # CutKit
//!
//! Compiles vector drawings into motion programs for drag-knife plotters
//! (SkyCut-style cutters speaking an HP-GL dialect).
//!
//! ## Architecture
//!
//! CutKit is organized as a workspace with multiple crates:
//!
//! 1. **cutkit-core** - Geometry, tools, units, calibration frame, motion program, errors
//! 2. **cutkit-camtools** - The compiler pipeline and SVG drawing source
//! 3. **cutkit-communication** - File and TCP byte sinks
//! 4. **cutkit-settings** - Persistent configuration
//! 5. **cutkit** - This crate: orchestration, logging and the CLI binary
//!
//! A run compiles once and delivers once. Compile failures surface as
//! `Err` before any text reaches a sink; a delivery failure is reported in
//! [`PlotReport::delivery`] alongside the program that was produced.

pub use cutkit_camtools::{
    CompileOptions, Compilation, Compiler, DrawingSource, MemoryDrawing, SvgDrawing,
};
pub use cutkit_communication::{ByteSink, DeliveryReceipt, FileSink, MemorySink, TcpSink};
pub use cutkit_core::{
    CalibrationFrame, ConfigurationError, DeliveryError, Error, GeometryError, MediaSize,
    MotionCommand, MotionProgram, OvercutPolicy, RegistrationMode, Result, ToolId,
};
pub use cutkit_settings::{Config, OutputMode, SettingsError};

use std::time::Duration;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Honors `RUST_LOG`, defaulting to INFO. Output goes to stderr so a
/// program printed on stdout stays clean.
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with_level(tracing::Level::INFO)
}

/// Initialize logging with an explicit default level
pub fn init_logging_with_level(level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env()?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Compiler parameters taken from a loaded configuration
pub fn compile_options(config: &Config) -> CompileOptions {
    CompileOptions {
        mode: config.registration.mode,
        cut_layer: config.cutting.cut_layer.clone(),
        mark_layer: config.registration.mark_layer.clone(),
        steps_per_segment: config.cutting.steps_per_segment,
        knife_offset_mm: config.cutting.knife_offset_mm,
        overcut_mm: config.cutting.overcut_mm,
        overcut_policy: config.cutting.overcut_policy,
        media: config.media.size,
        ..CompileOptions::default()
    }
}

/// The sink selected by `output.mode`
///
/// File output with an empty path fails here, before anything is compiled.
pub fn sink_for(config: &Config) -> std::result::Result<Box<dyn ByteSink>, ConfigurationError> {
    match config.output.mode {
        OutputMode::File => {
            let sink = FileSink::new(&config.output.path, config.output_base_dir())?;
            Ok(Box::new(sink))
        }
        OutputMode::Network => Ok(Box::new(TcpSink::new(
            config.connection.host.clone(),
            config.connection.port,
            Duration::from_millis(config.connection.timeout_ms),
        ))),
    }
}

/// Outcome of one plot run
#[derive(Debug)]
pub struct PlotReport {
    /// The compiled program, present even when delivery failed
    pub program: MotionProgram,
    pub delivery: std::result::Result<DeliveryReceipt, DeliveryError>,
}

impl PlotReport {
    pub fn is_delivered(&self) -> bool {
        self.delivery.is_ok()
    }
}

/// Compile `source` and hand the rendered program to `sink`
///
/// Returns `Err` only for compile failures, in which case the sink is never
/// touched.
pub fn plot(
    source: &dyn DrawingSource,
    options: &CompileOptions,
    sink: &mut dyn ByteSink,
) -> Result<PlotReport> {
    let compiler = Compiler::new(options.clone())?;
    let program = compiler.compile(source)?;
    let text = program.render();

    let delivery = sink.deliver(&text);
    match &delivery {
        Ok(receipt) => tracing::info!(
            "Delivered {} bytes to {}",
            receipt.bytes_written,
            receipt.target
        ),
        Err(e) => tracing::error!("Delivery to {} failed: {}", sink.describe(), e),
    }

    Ok(PlotReport { program, delivery })
}

/// Parse SVG text and plot it with settings from `config`
pub fn plot_svg(svg: &str, config: &Config, sink: &mut dyn ByteSink) -> Result<PlotReport> {
    let drawing = SvgDrawing::parse(svg)?;
    plot(&drawing, &compile_options(config), sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutkit_core::{pt, SourcePath};

    struct RefusingSink;

    impl ByteSink for RefusingSink {
        fn deliver(&mut self, _text: &str) -> std::result::Result<DeliveryReceipt, DeliveryError> {
            Err(DeliveryError::Connect {
                address: "plotter".to_string(),
                reason: "refused".to_string(),
            })
        }

        fn describe(&self) -> String {
            "plotter".to_string()
        }
    }

    fn square_drawing() -> MemoryDrawing {
        MemoryDrawing::new().with_layer(
            "Cut",
            vec![SourcePath::polygon(
                &[pt(10.0, 10.0), pt(50.0, 10.0), pt(50.0, 50.0), pt(10.0, 50.0)],
                "#ff0000",
            )],
        )
    }

    fn bbox_options() -> CompileOptions {
        CompileOptions {
            mode: RegistrationMode::BoundingBox,
            ..CompileOptions::default()
        }
    }

    #[test]
    fn test_plot_delivers_rendered_program() {
        let mut sink = MemorySink::new();
        let report = plot(&square_drawing(), &bbox_options(), &mut sink).unwrap();
        assert!(report.is_delivered());
        assert_eq!(sink.delivered(), &[report.program.render()]);
        assert!(sink.delivered()[0].ends_with("U0,0;\n@;\n@;"));
    }

    #[test]
    fn test_delivery_failure_keeps_program() {
        let report = plot(&square_drawing(), &bbox_options(), &mut RefusingSink).unwrap();
        assert!(!report.is_delivered());
        assert!(report.program.motion_count() > 0);
    }

    #[test]
    fn test_compile_failure_never_reaches_sink() {
        let mut sink = MemorySink::new();
        let err = plot(&MemoryDrawing::new(), &bbox_options(), &mut sink).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(sink.delivered().is_empty());
    }

    #[test]
    fn test_compile_options_follow_config() {
        let mut config = Config::default();
        config.cutting.overcut_mm = 1.25;
        config.cutting.steps_per_segment = 4;
        config.media.size = MediaSize::A3l;
        let options = compile_options(&config);
        assert_eq!(options.overcut_mm, 1.25);
        assert_eq!(options.steps_per_segment, 4);
        assert_eq!(options.media, MediaSize::A3l);
        assert_eq!(options.mode, RegistrationMode::Marker);
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = Config::default();
        config.output.mode = OutputMode::File;
        config.output.path = String::new();
        assert!(matches!(
            sink_for(&config),
            Err(ConfigurationError::EmptyOutputPath)
        ));
    }
}
