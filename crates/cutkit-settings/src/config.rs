//! Configuration and settings management for CutKit
//!
//! Supports JSON and TOML file formats, chosen by file extension. The default
//! file lives in the platform config directory (`cutkit/config.toml`).
//!
//! Configuration is organized into logical sections:
//! - Registration (mode, marker layer, corner marker geometry)
//! - Cutting (cut layer, knife offset, overcut, curve sampling)
//! - Media (page size)
//! - Connection (plotter host, port, timeout)
//! - Output (file or network delivery)

use crate::error::{SettingsError, SettingsResult};
use cutkit_core::constants::{CUT_LAYER, DEFAULT_STEPS_PER_SEGMENT, MARK_LAYER, MAX_OVERCUT_MM};
use cutkit_core::{MediaSize, OvercutPolicy, RegistrationMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where a finished program goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Write to `output.path`
    File,
    /// Stream to the plotter over TCP
    #[default]
    Network,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Network => write!(f, "network"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "save" => Ok(Self::File),
            "network" | "tcp" | "send" => Ok(Self::Network),
            _ => Err(format!("Unknown output mode: {}", s)),
        }
    }
}

/// Registration settings
///
/// `offset_mm`, `marker_arm_mm` and `marker_stroke_mm` describe how corner
/// markers are drawn. CutKit only reads existing markers, so these keys are
/// recognized and validated for compatibility with shared config files but
/// do not affect a compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationSettings {
    pub mode: RegistrationMode,
    /// Layer holding the corner markers (matched by substring)
    pub mark_layer: String,
    /// Distance from the artwork to the corner markers (mm), unused by the compiler
    pub offset_mm: f64,
    /// Length of each L-marker arm (mm), unused by the compiler
    pub marker_arm_mm: f64,
    /// Marker stroke width (mm), unused by the compiler
    pub marker_stroke_mm: f64,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            mode: RegistrationMode::Marker,
            mark_layer: MARK_LAYER.to_string(),
            offset_mm: 5.0,
            marker_arm_mm: 15.0,
            marker_stroke_mm: 1.0,
        }
    }
}

/// Cutting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuttingSettings {
    /// Layer holding the paths to plot (exact match)
    pub cut_layer: String,
    pub knife_offset_mm: f64,
    pub overcut_mm: f64,
    pub overcut_policy: OvercutPolicy,
    /// Samples per bezier segment
    pub steps_per_segment: u32,
}

impl Default for CuttingSettings {
    fn default() -> Self {
        Self {
            cut_layer: CUT_LAYER.to_string(),
            knife_offset_mm: 0.30,
            overcut_mm: 0.30,
            overcut_policy: OvercutPolicy::AllCutTools,
            steps_per_segment: DEFAULT_STEPS_PER_SEGMENT,
        }
    }
}

/// Media settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MediaSettings {
    pub size: MediaSize,
}

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Plotter hostname or IP address
    pub host: String,
    pub port: u16,
    /// Connection timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "192.168.0.233".to_string(),
            port: 8080,
            timeout_ms: 90_000,
        }
    }
}

impl ConnectionSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub mode: OutputMode,
    /// Output file; relative paths resolve against `base_dir`
    pub path: String,
    /// Defaults to the current directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            mode: OutputMode::Network,
            path: "skycut_output.hpgl".to_string(),
            base_dir: None,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub registration: RegistrationSettings,
    pub cutting: CuttingSettings,
    pub media: MediaSettings,
    pub connection: ConnectionSettings,
    pub output: OutputSettings,
}

enum Format {
    Toml,
    Json,
}

fn format_for(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
        _ => Err(SettingsError::UnsupportedFormat(path.display().to_string())),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location: `<config dir>/cutkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("cutkit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_for(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path`, or the default file when `path` is `None`
    ///
    /// A missing default file yields the built-in defaults; an explicitly
    /// named file must exist.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path() {
                Ok(path) if path.exists() => Self::load_from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_for(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let non_negative = |key: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(SettingsError::invalid(key, format!("must be >= 0, got {}", value)))
            }
        };

        // Registration
        if self.registration.mode == RegistrationMode::Marker
            && self.registration.mark_layer.trim().is_empty()
        {
            return Err(SettingsError::invalid(
                "registration.mark_layer",
                "must not be empty in marker mode",
            ));
        }
        non_negative("registration.offset_mm", self.registration.offset_mm)?;
        non_negative("registration.marker_arm_mm", self.registration.marker_arm_mm)?;
        non_negative("registration.marker_stroke_mm", self.registration.marker_stroke_mm)?;

        // Cutting
        if self.cutting.cut_layer.trim().is_empty() {
            return Err(SettingsError::invalid("cutting.cut_layer", "must not be empty"));
        }
        non_negative("cutting.knife_offset_mm", self.cutting.knife_offset_mm)?;
        non_negative("cutting.overcut_mm", self.cutting.overcut_mm)?;
        if self.cutting.overcut_mm > MAX_OVERCUT_MM {
            return Err(SettingsError::invalid(
                "cutting.overcut_mm",
                format!("must be at most {} mm", MAX_OVERCUT_MM),
            ));
        }
        if self.cutting.steps_per_segment == 0 {
            return Err(SettingsError::invalid(
                "cutting.steps_per_segment",
                "must be >= 1",
            ));
        }

        // Connection
        if self.connection.host.trim().is_empty() {
            return Err(SettingsError::invalid("connection.host", "must not be empty"));
        }
        if self.connection.port == 0 {
            return Err(SettingsError::invalid("connection.port", "must be > 0"));
        }
        if self.connection.timeout_ms == 0 {
            return Err(SettingsError::invalid("connection.timeout_ms", "must be > 0"));
        }

        // Output
        if self.output.mode == OutputMode::File && self.output.path.trim().is_empty() {
            return Err(SettingsError::invalid(
                "output.path",
                "must not be empty when output mode is file",
            ));
        }

        Ok(())
    }

    /// Directory relative output paths resolve against
    pub fn output_base_dir(&self) -> PathBuf {
        self.output
            .base_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_plotter_setup() {
        let config = Config::default();
        assert_eq!(config.cutting.knife_offset_mm, 0.30);
        assert_eq!(config.cutting.overcut_mm, 0.30);
        assert_eq!(config.cutting.steps_per_segment, 16);
        assert_eq!(config.media.size, MediaSize::A4p);
        assert_eq!(config.connection.address(), "192.168.0.233:8080");
        assert_eq!(config.connection.timeout_ms, 90_000);
        assert_eq!(config.registration.offset_mm, 5.0);
        assert_eq!(config.registration.marker_arm_mm, 15.0);
        assert_eq!(config.registration.marker_stroke_mm, 1.0);
        assert_eq!(config.output.path, "skycut_output.hpgl");
        assert_eq!(config.output.mode, OutputMode::Network);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.cutting.steps_per_segment = 0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { key, .. }) if key == "cutting.steps_per_segment"
        ));

        let mut config = Config::default();
        config.cutting.overcut_mm = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cutting.overcut_mm = 1e12;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { key, .. }) if key == "cutting.overcut_mm"
        ));

        let mut config = Config::default();
        config.output.mode = OutputMode::File;
        config.output.path = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.connection.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cutting]
            overcut_mm = 1.5

            [media]
            size = "a3l"
            "#,
        )
        .unwrap();
        assert_eq!(config.cutting.overcut_mm, 1.5);
        assert_eq!(config.cutting.knife_offset_mm, 0.30);
        assert_eq!(config.media.size, MediaSize::A3l);
        assert_eq!(config.connection.port, 8080);
    }

    #[test]
    fn test_output_mode_parse() {
        assert_eq!("tcp".parse::<OutputMode>(), Ok(OutputMode::Network));
        assert_eq!("File".parse::<OutputMode>(), Ok(OutputMode::File));
        assert!("usb".parse::<OutputMode>().is_err());
    }
}
