//! CutKit Settings Crate
//!
//! Handles plotter configuration and its persistence.

pub mod config;
pub mod error;

pub use config::{
    Config, ConnectionSettings, CuttingSettings, MediaSettings, OutputMode, OutputSettings,
    RegistrationSettings,
};
pub use error::{SettingsError, SettingsResult};
