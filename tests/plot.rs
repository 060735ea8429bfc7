//! Compile-and-deliver runs through the public API

use cutkit::{plot_svg, sink_for, Config, OutputMode, RegistrationMode};
use tempfile::TempDir;

const BBOX_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
     viewBox="0 0 100 100">
  <g inkscape:groupmode="layer" inkscape:label="Cut">
    <rect x="20" y="20" width="30" height="20" style="fill:none;stroke:red"/>
  </g>
</svg>
"##;

fn file_config(dir: &TempDir, path: &str) -> Config {
    let mut config = Config::default();
    config.registration.mode = RegistrationMode::BoundingBox;
    config.output.mode = OutputMode::File;
    config.output.path = path.to_string();
    config.output.base_dir = Some(dir.path().to_path_buf());
    config
}

#[test]
fn test_plot_to_relative_file() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir, "jobs/square.hpgl");
    let mut sink = sink_for(&config).unwrap();

    let report = plot_svg(BBOX_SVG, &config, sink.as_mut()).unwrap();
    assert!(report.is_delivered());

    let written = std::fs::read_to_string(dir.path().join("jobs/square.hpgl")).unwrap();
    assert_eq!(written, report.program.render());
    assert!(written.starts_with("IN\nCMD:18,1;\nCMD:35,1,2,0;\n"));
    assert!(written.contains("P1;"));
}

#[test]
fn test_missing_cut_layer_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut config = file_config(&dir, "out.hpgl");
    config.cutting.cut_layer = "Engrave".to_string();
    let mut sink = sink_for(&config).unwrap();

    let err = plot_svg(BBOX_SVG, &config, sink.as_mut()).unwrap_err();
    assert!(err.is_configuration_error());
    assert!(!dir.path().join("out.hpgl").exists());
}
