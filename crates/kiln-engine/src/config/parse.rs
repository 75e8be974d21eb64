use std::path::PathBuf;

use serde::Deserialize;

use super::Config;
use crate::color::Color;
use crate::logging::Verbosity;

/// Where the entry point looks for its config file.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    window: RawWindow,
    background_color: Option<String>,
    log_level: Option<i64>,
    log_file_path: Option<PathBuf>,
    show_fps: Option<bool>,
    resources_directory: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWindow {
    width: Option<u32>,
    height: Option<u32>,
    min_width: Option<u32>,
    min_height: Option<u32>,
    title: Option<String>,
    start_maximized: Option<bool>,
}

impl Config {
    /// Parses a TOML config document.
    ///
    /// Syntax and type errors fail the whole document. Semantic problems in
    /// individual values (bad color code, out of range log level, paths that
    /// do not exist) are logged and fall back to the default for that key.
    pub fn from_toml_str(text: &str) -> Result<Config, toml::de::Error> {
        let raw: RawConfig = toml::from_str(text)?;
        Ok(raw.into_config())
    }
}

impl RawConfig {
    fn into_config(self) -> Config {
        let defaults = Config::default();

        let background_color = match self.background_color.as_deref().map(Color::parse) {
            Some(Ok(color)) => color,
            Some(Err(e)) => {
                log::error!("{e}");
                defaults.background_color
            }
            None => defaults.background_color,
        };

        let verbosity = match self.log_level.map(Verbosity::try_from) {
            Some(Ok(v)) => v,
            Some(Err(level)) => {
                log::warn!("invalid log_level {level} in config, assuming default");
                defaults.verbosity
            }
            None => defaults.verbosity,
        };

        let log_file_path = self
            .log_file_path
            .filter(|p| p.exists())
            .unwrap_or(defaults.log_file_path);

        let resources_directory = self
            .resources_directory
            .filter(|p| p.exists())
            .unwrap_or(defaults.resources_directory);

        let w = self.window;
        Config {
            window_width: w.width.unwrap_or(defaults.window_width),
            window_height: w.height.unwrap_or(defaults.window_height),
            min_window_width: w.min_width.unwrap_or(defaults.min_window_width),
            min_window_height: w.min_height.unwrap_or(defaults.min_window_height),
            window_title: w.title.unwrap_or(defaults.window_title),
            background_color,
            verbosity,
            log_file_path,
            // An explicit file opts into FPS display.
            show_fps: self.show_fps.unwrap_or(false),
            start_window_maximized: w.start_maximized.unwrap_or(defaults.start_window_maximized),
            resources_directory,
        }
    }
}
